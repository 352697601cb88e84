use serde::{Deserialize, Serialize};

/// Plain-data configuration for [`crate::TradeSimulator`]. Numeric fields use
/// `f64` semantics, matching spec.md §6.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub initial_capital: f64,
    pub quantity: f64,
    /// Fractional adverse price adjustment applied on every fill (default `1e-4`).
    pub slippage: f64,
    /// Trading window start, IST minute-of-day.
    pub window_start_minute: u32,
    /// Trading window end, IST minute-of-day (exclusive).
    pub window_end_minute: u32,
    /// Default stop-loss distance as a fraction of entry price, used only
    /// when a signal doesn't attach its own `stop_loss`.
    pub default_sl_pct: f64,
    /// Default take-profit distance as a fraction of entry price, used only
    /// when a signal doesn't attach its own `take_profit`.
    pub default_tp_pct: f64,
    /// Enables the trailing-stop ratchet.
    pub trailing_stop_enabled: bool,
    /// Trailing distance as a fraction of the highest price seen since entry.
    pub trailing_pct: f64,
    pub exchange: costs::Exchange,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            quantity: 1.0,
            slippage: 1e-4,
            window_start_minute: htf::MARKET_OPEN_MINUTE,
            window_end_minute: htf::FORCED_CLOSE_MINUTE,
            default_sl_pct: 0.01,
            default_tp_pct: 0.02,
            trailing_stop_enabled: false,
            trailing_pct: 0.01,
            exchange: costs::Exchange::Nse,
        }
    }
}
