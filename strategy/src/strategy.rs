use simulator::{Bar, IndicatorSnapshot, Signal, SimulatorConfig, Trade, TradeSimulator};

use crate::error::Result;

/// Strategy-specific derived analytics, purely a function of the closed
/// trade list; feeds export formatting only, never consumed by the core
/// pipeline itself.
pub type StrategyAnalytics = IndicatorSnapshot;

/// Full output of [`Strategy::run_backtest`].
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub metrics: metrics::Metrics,
    pub equity: Vec<(i64, f64)>,
    pub analytics: StrategyAnalytics,
    pub bars_in_position: u64,
    pub total_market_bars: u64,
}

/// A pluggable signal-generation strategy.
///
/// `generate_signals` is pure: given the same bars and strategy state it must
/// be deterministic and side-effect free (spec.md §4.3's determinism clause;
/// see the idempotence property in spec.md §8).
pub trait Strategy {
    fn name(&self) -> &str;
    fn version(&self) -> &str;

    /// Diagnostic indicator keys this strategy attaches to its signals, for export.
    fn indicator_names(&self) -> &[&str];

    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>>;

    /// Strategy-specific derived analytics over the closed trade list. The
    /// default is empty; concrete strategies override where they have
    /// something worth exporting (e.g. breakout strategies' reset-level history).
    fn analytics(&self, _trades: &[Trade]) -> StrategyAnalytics {
        IndicatorSnapshot::new()
    }

    /// Orchestration helper chaining this strategy with the trade simulator
    /// and metrics engine — the one place `strategy` depends on both.
    fn run_backtest(&self, bars: &[Bar], capital: f64, sim_config: &SimulatorConfig) -> Result<BacktestResult> {
        let signals = self.generate_signals(bars)?;

        let mut config = *sim_config;
        config.initial_capital = capital;

        let sim = TradeSimulator::new(&config);
        let sim_result = sim.run(bars, &signals);

        let metrics_bundle = metrics::compute(
            &sim_result.trades,
            capital,
            sim_result.bars_in_position,
            sim_result.total_market_bars,
        )?;

        let analytics = self.analytics(&sim_result.trades);

        Ok(BacktestResult {
            trades: sim_result.trades,
            metrics: metrics_bundle,
            equity: sim_result.equity,
            analytics,
            bars_in_position: sim_result.bars_in_position,
            total_market_bars: sim_result.total_market_bars,
        })
    }
}
