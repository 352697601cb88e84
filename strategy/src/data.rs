//! Bar, signal and diagnostic-snapshot types. These are defined in
//! `simulator` (which needs them as input to the trade simulator, and is
//! lower than `strategy` in the dependency graph) and re-exported here as
//! the strategy layer's public data model, matching spec.md §3 verbatim.

pub use simulator::{Bar, IndicatorSnapshot, Side, Signal, SnapshotValue};
