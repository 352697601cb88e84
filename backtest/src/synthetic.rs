//! Synthetic minute-bar generator for demos and ad-hoc strategy smoke tests.
//!
//! Generalises the teacher's `minute_trade::utils::generate_minute_data` —
//! same U-shaped intraday volatility/volume pattern and day-trend term — onto
//! IST trading-day timestamps (09:30-14:30, five sessions/week) rather than
//! that function's UTC-midnight, fixed-`points_per_day` convention.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use htf::{ist_offset, MARKET_OPEN_MINUTE};

use crate::Bar;

/// Plain-data configuration for [`synthetic_bars`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyntheticDataConfig {
    pub trading_days: usize,
    pub base_price: f64,
    /// Per-minute volatility as a fraction of price.
    pub volatility: f64,
    /// Per-minute drift as a fraction of price.
    pub trend: f64,
}

impl Default for SyntheticDataConfig {
    fn default() -> Self {
        Self { trading_days: 5, base_price: 100.0, volatility: 0.001, trend: 0.0 }
    }
}

const SESSION_MINUTES: i64 = 300; // 09:30 - 14:30 IST

/// Generates `config.trading_days` sessions of one-minute IST bars starting
/// 2024-01-01, skipping weekends. Intraday volatility and volume follow a
/// U-shape (elevated near the open and the 14:30 close).
pub fn synthetic_bars(config: &SyntheticDataConfig) -> Vec<Bar> {
    let mut rng = rand::thread_rng();
    let mut bars = Vec::with_capacity(config.trading_days * SESSION_MINUTES as usize);
    let mut price = config.base_price;
    let ist = ist_offset();

    let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid calendar date");
    let mut sessions_built = 0;

    while sessions_built < config.trading_days {
        if date.weekday().num_days_from_monday() >= 5 {
            date = date.succ_opt().expect("date within chrono's range");
            continue;
        }

        let session_open = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_local_timezone(ist)
            .single()
            .expect("fixed offset has no ambiguous instants")
            .timestamp()
            + MARKET_OPEN_MINUTE as i64 * 60;

        for minute in 0..SESSION_MINUTES {
            let minute_factor = minute as f64 / SESSION_MINUTES as f64;
            let intraday_vol = 1.0 + 0.5 * (-4.0 * (minute_factor - 0.5).powi(2) + 1.0);

            let price_change = price * config.volatility * intraday_vol * (rng.gen::<f64>() - 0.5);
            let drift = price * config.trend;

            let open = price;
            price = (open + price_change + drift).max(0.01);
            let close = price;

            let high = open.max(close) + rng.gen::<f64>() * config.volatility * open * 0.2;
            let low = (open.min(close) - rng.gen::<f64>() * config.volatility * open * 0.2).max(0.01);

            let volume_base = 1000.0 + 5000.0 * intraday_vol;
            let volume = volume_base * (0.5 + rng.gen::<f64>());

            bars.push(Bar {
                timestamp: session_open + minute * 60,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        sessions_built += 1;
        date = date.succ_opt().expect("date within chrono's range");
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_the_requested_number_of_sessions() {
        let bars = synthetic_bars(&SyntheticDataConfig { trading_days: 3, ..SyntheticDataConfig::default() });
        assert_eq!(bars.len(), 3 * SESSION_MINUTES as usize);
    }

    #[test]
    fn timestamps_are_strictly_increasing() {
        let bars = synthetic_bars(&SyntheticDataConfig { trading_days: 2, ..SyntheticDataConfig::default() });
        for pair in bars.windows(2) {
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
    }

    #[test]
    fn ohlc_invariants_hold_on_every_generated_bar() {
        let bars = synthetic_bars(&SyntheticDataConfig::default());
        for bar in &bars {
            assert!(bar.validate().is_ok());
        }
    }
}
