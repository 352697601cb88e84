//! Six-horizon performance metrics engine.
//!
//! Consumes the closed-trade list produced by `simulator` plus its
//! `bars_in_position`/`total_market_bars` counters and produces the
//! `{daily, weekly, monthly, quarterly, yearly, overall}` bundle.

mod data;
mod engine;
mod error;
mod period;

pub use data::MetricData;
pub use engine::{compute, Metrics};
pub use error::{MetricsError, Result};
