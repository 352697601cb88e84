//! Candlestick-pattern entry with an EMA trend zone, ADX filter, volume
//! filter, and dual hourly+daily HTF confirmation (spec.md §4.3.b).
//!
//! Loosely grounded in the teacher's
//! `minute_trade::strategies::pattern::chart_pattern_strategy` pattern-struct
//! idiom, rewritten against plain OHLC bars and the five candlestick
//! detectors in `crate::patterns` rather than that module's broader
//! chart-pattern catalogue (flags/triangles/head-and-shoulders).

use htf::{HtfAggregator, HtfInterval};
use indicators::{adx, ema, sma, Ema};
use serde::{Deserialize, Serialize};

use crate::data::{Bar, IndicatorSnapshot, Signal, SnapshotValue};
use crate::error::{Result, StrategyError};
use crate::filters::{adx_gate_satisfied, within_trading_window, DailyTradeCap};
use crate::patterns::{detect_bearish, detect_bullish};
use crate::strategy::Strategy;
use crate::time::{FORCED_CLOSE_MINUTE, MARKET_OPEN_MINUTE};

/// Plain-data configuration for [`CandlestickPatternStrategy`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandlestickPatternConfig {
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub adx_period: usize,
    pub adx_threshold: f64,
    pub volume_sma_period: usize,
    pub volume_mult: f64,
    /// EMA period used for the hourly/daily "is HTF bullish?" check (default 21).
    pub htf_ema_period: usize,
    pub trading_window: (u32, u32),
    pub daily_trade_cap: Option<usize>,
}

impl Default for CandlestickPatternConfig {
    fn default() -> Self {
        Self {
            ema_fast_period: 9,
            ema_slow_period: 21,
            adx_period: 14,
            adx_threshold: 20.0,
            volume_sma_period: 20,
            volume_mult: 1.5,
            htf_ema_period: 21,
            trading_window: (MARKET_OPEN_MINUTE, FORCED_CLOSE_MINUTE),
            daily_trade_cap: None,
        }
    }
}

/// Candlestick-pattern strategy with an EMA trend zone and dual-timeframe
/// confirmation. Entry requires: bullish EMA zone, `ADX >= threshold`,
/// volume above `volume_mult * SMA(volume, 20)`, both the hourly and daily
/// completed HTF candle closing above their own EMA21, and a bullish
/// candlestick pattern on the trailing three bars. Exit fires on a bearish
/// zone or ADX falling below threshold, together with a bearish pattern.
pub struct CandlestickPatternStrategy {
    config: CandlestickPatternConfig,
}

impl CandlestickPatternStrategy {
    pub fn new(config: CandlestickPatternConfig) -> Self {
        Self { config }
    }
}

impl Strategy for CandlestickPatternStrategy {
    fn name(&self) -> &str {
        "candlestick-pattern"
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn indicator_names(&self) -> &[&str] {
        &["ema_fast", "ema_slow", "adx", "volume_ratio", "pattern", "htf_hourly_bullish", "htf_daily_bullish"]
    }

    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>> {
        let needed = self.config.ema_slow_period.max(2 * self.config.adx_period).max(self.config.volume_sma_period);
        if bars.len() < needed {
            return Err(StrategyError::InsufficientData { needed, got: bars.len() });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let ema_fast = ema(&closes, self.config.ema_fast_period)?;
        let ema_slow = ema(&closes, self.config.ema_slow_period)?;
        let adx_series = adx(&highs, &lows, &closes, self.config.adx_period)?;
        let volume_sma = sma(&volumes, self.config.volume_sma_period)?;

        let mut hourly_agg = HtfAggregator::new(HtfInterval::FixedSeconds(3600));
        let mut daily_agg = HtfAggregator::new(HtfInterval::Daily);
        let mut hourly_ema = Ema::new(self.config.htf_ema_period)?;
        let mut daily_ema = Ema::new(self.config.htf_ema_period)?;
        let mut hourly_view: Option<(f64, f64)> = None; // (close, ema) of the last completed hourly bar
        let mut daily_view: Option<(f64, f64)> = None;

        let mut signals = Vec::new();
        let mut cap = self.config.daily_trade_cap.map(DailyTradeCap::new);
        let mut in_position = false;

        for i in 0..bars.len() {
            let bar = &bars[i];

            if let Some(completed) = hourly_agg.push(bar) {
                if let Some(v) = hourly_ema.update(completed.close) {
                    hourly_view = Some((completed.close, v));
                }
            }
            if let Some(completed) = daily_agg.push(bar) {
                if let Some(v) = daily_ema.update(completed.close) {
                    daily_view = Some((completed.close, v));
                }
            }

            let (Some(fast), Some(slow)) = (ema_fast[i], ema_slow[i]) else { continue };
            let adx_value = adx_series[i];
            let volume_avg = volume_sma[i];

            let bullish_zone = fast > slow;
            let bearish_zone = fast < slow;

            let window: &[Bar] = &bars[i.saturating_sub(2)..=i];
            let mut snapshot = IndicatorSnapshot::new();
            snapshot.insert("ema_fast", SnapshotValue::Number(fast));
            snapshot.insert("ema_slow", SnapshotValue::Number(slow));
            if let Some(a) = adx_value {
                snapshot.insert("adx", SnapshotValue::Number(a));
            }

            if in_position {
                if let Some(bearish) = detect_bearish(window) {
                    if bearish_zone || !adx_gate_satisfied(adx_value, self.config.adx_threshold) {
                        snapshot.insert("pattern", SnapshotValue::Text(bearish.name().to_string()));
                        signals.push(Signal::sell(bar.timestamp, bar.close).with_indicators(snapshot));
                        in_position = false;
                    }
                }
                continue;
            }

            if !bullish_zone {
                continue;
            }
            if !within_trading_window(bar.timestamp, self.config.trading_window.0, self.config.trading_window.1) {
                continue;
            }
            if !adx_gate_satisfied(adx_value, self.config.adx_threshold) {
                continue;
            }
            let Some(volume_avg) = volume_avg else { continue };
            if bar.volume <= self.config.volume_mult * volume_avg {
                continue;
            }
            let Some((hourly_close, hourly_ema_value)) = hourly_view else { continue };
            let Some((daily_close, daily_ema_value)) = daily_view else { continue };
            let htf_hourly_bullish = hourly_close > hourly_ema_value;
            let htf_daily_bullish = daily_close > daily_ema_value;
            if !htf_hourly_bullish || !htf_daily_bullish {
                continue;
            }
            let Some(pattern) = detect_bullish(window) else { continue };
            if let Some(cap) = cap.as_mut() {
                if !cap.can_enter(bar.timestamp) {
                    continue;
                }
            }

            snapshot.insert("volume_ratio", SnapshotValue::Number(bar.volume / volume_avg));
            snapshot.insert("pattern", SnapshotValue::Text(pattern.name().to_string()));
            snapshot.insert("htf_hourly_bullish", SnapshotValue::Flag(htf_hourly_bullish));
            snapshot.insert("htf_daily_bullish", SnapshotValue::Flag(htf_daily_bullish));

            signals.push(Signal::buy(bar.timestamp, bar.close).with_indicators(snapshot));
            if let Some(cap) = cap.as_mut() {
                cap.record_entry(bar.timestamp);
            }
            in_position = true;
        }

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar { timestamp: ts, open, high, low, close, volume }
    }

    #[test]
    fn insufficient_data_is_surfaced_not_panicked() {
        let bars = vec![bar(0, 100.0, 100.1, 99.9, 100.0, 100.0)];
        let strategy = CandlestickPatternStrategy::new(CandlestickPatternConfig::default());
        assert!(strategy.generate_signals(&bars).is_err());
    }

    #[test]
    fn no_signals_without_htf_confirmation_or_pattern() {
        // Flat, low-volume series: none of the entry gates should pass.
        let mut bars = Vec::new();
        let mut ts = 4 * 3600;
        for _ in 0..80 {
            bars.push(bar(ts, 100.0, 100.2, 99.8, 100.0, 50.0));
            ts += 60;
        }
        let strategy = CandlestickPatternStrategy::new(CandlestickPatternConfig::default());
        let signals = strategy.generate_signals(&bars).unwrap();
        assert!(signals.iter().all(|s| s.side != crate::data::Side::Buy));
    }
}
