//! Facade crate wiring the indicator/HTF/strategy/simulator/metrics pipeline
//! into a single [`run_backtest`] entry point, plus bar ingestion helpers
//! (`CSV` and synthetic-data generation) for the `backtest-cli` binary.
//!
//! The computational crates (`indicators`, `htf`, `strategy`, `simulator`,
//! `metrics`) stay dependency-light; this crate is where `backtest-cli`'s
//! heavier ambient dependencies (`rand`, `tracing`, `anyhow`) actually live.

mod synthetic;

pub use htf::Bar;
pub use metrics::Metrics;
pub use simulator::SimulatorConfig;
pub use strategy::{BacktestResult, Strategy};
pub use synthetic::{synthetic_bars, SyntheticDataConfig};

use std::io::BufRead;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("strategy error: {0}")]
    Strategy(#[from] strategy::StrategyError),

    #[error("malformed CSV row {row}: {detail}")]
    MalformedRow { row: usize, detail: String },

    #[error("io error reading bar data: {0}")]
    Io(String),
}

/// Runs `strategy` over `bars` through the simulator and metrics engine.
/// Thin pass-through to [`strategy::Strategy::run_backtest`] so callers can
/// depend on this crate alone rather than threading `strategy`/`simulator`
/// re-exports through themselves.
pub fn run_backtest(
    strategy: &dyn Strategy,
    bars: &[Bar],
    capital: f64,
    sim_config: &SimulatorConfig,
) -> Result<BacktestResult, BacktestError> {
    Ok(strategy.run_backtest(bars, capital, sim_config)?)
}

/// Loads minute bars from a `timestamp,open,high,low,close,volume` CSV
/// stream (no header row). `timestamp` is seconds since the Unix epoch.
pub fn load_bars_csv<R: BufRead>(reader: R) -> Result<Vec<Bar>, BacktestError> {
    let mut bars = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| BacktestError::Io(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 6 {
            return Err(BacktestError::MalformedRow { row: i, detail: format!("expected 6 fields, got {}", fields.len()) });
        }
        let parse = |s: &str| -> Result<f64, BacktestError> {
            s.trim().parse::<f64>().map_err(|e| BacktestError::MalformedRow { row: i, detail: e.to_string() })
        };
        let timestamp: i64 = fields[0]
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| BacktestError::MalformedRow { row: i, detail: e.to_string() })?;
        bars.push(Bar {
            timestamp,
            open: parse(fields[1])?,
            high: parse(fields[2])?,
            low: parse(fields[3])?,
            close: parse(fields[4])?,
            volume: parse(fields[5])?,
        });
    }
    Ok(bars)
}
