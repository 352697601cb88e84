//! Single-position trade simulator.
//!
//! Turns a bar stream and a time-aligned signal stream into closed trades,
//! following the fixed exit precedence: forced close, stop-loss,
//! take-profit, SELL signal, trailing-stop ratchet. Also owns the signal/
//! trade data model — `strategy` builds `Signal`s using the types re-exported
//! here, and `metrics` consumes the `Trade`s this crate produces — so that
//! `strategy`'s orchestration helper can depend downward on both without a
//! dependency cycle.

mod config;
mod error;
mod simulator;
mod types;

pub use config::SimulatorConfig;
pub use error::{Result, SimulatorError};
pub use simulator::{EquitySample, SimResult, TradeSimulator};
pub use types::{Bar, ExitReason, IndicatorSnapshot, Position, Side, Signal, SnapshotValue, Trade, TradeCosts};
