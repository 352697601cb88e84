//! Moving-average crossover strategy (spec.md §4.3.a): a "simple" signal-only
//! variant and a richer variant gated by ADX, an EMA-gap filter, a
//! time-of-day skip window, and ATR-derived stop-loss/take-profit.
//!
//! Generalises the teacher's `day_trade::strategies::buy::MACrossover`
//! SMA-only crossover-detection loop to SMA-or-EMA plus the additional
//! gates spec.md adds.

use indicators::{adx, atr, ema, sma};
use serde::{Deserialize, Serialize};

use crate::data::{Bar, IndicatorSnapshot, Signal, SnapshotValue};
use crate::error::{Result, StrategyError};
use crate::filters::{adx_gate_satisfied, ema_gap_satisfied, outside_skip_window, within_trading_window, DailyTradeCap};
use crate::strategy::Strategy;
use crate::time::{FORCED_CLOSE_MINUTE, MARKET_OPEN_MINUTE};

/// Which moving average the crossover is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaKind {
    Sma,
    Ema,
}

/// ATR-derived stop-loss/take-profit attached to the rich variant's BUY signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrStopConfig {
    pub period: usize,
    pub sl_mult: f64,
    pub tp_mult: f64,
}

/// Plain-data configuration for [`MaCrossoverStrategy`]. The "simple"
/// variant of spec.md §4.3.a is just this struct with every optional gate
/// left `None` — both sides of the crossover fire unconditionally and no
/// SL/TP is attached, so the simulator's entry/exit are signal-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaCrossoverConfig {
    pub kind: MaKind,
    pub fast_period: usize,
    pub slow_period: usize,
    /// `[start, end)` IST minutes; entries only, exits ignore this window.
    pub trading_window: (u32, u32),
    pub daily_trade_cap: Option<usize>,
    /// `(period, threshold)` — entry suppressed unless minute-series ADX >= threshold.
    pub adx_gate: Option<(usize, f64)>,
    /// Entry suppressed unless `|fast - slow| / slow >= min_gap`.
    pub ema_gap_min: Option<f64>,
    /// Entries suppressed inside `[start, end)` IST.
    pub skip_window: Option<(u32, u32)>,
    pub atr_stop: Option<AtrStopConfig>,
}

impl Default for MaCrossoverConfig {
    fn default() -> Self {
        Self {
            kind: MaKind::Sma,
            fast_period: 3,
            slow_period: 5,
            trading_window: (MARKET_OPEN_MINUTE, FORCED_CLOSE_MINUTE),
            daily_trade_cap: None,
            adx_gate: None,
            ema_gap_min: None,
            skip_window: None,
            atr_stop: None,
        }
    }
}

/// Moving-average crossover: BUY when the fast MA crosses strictly above
/// the slow MA, SELL on the opposite crossing. At `i`, `prevFast <=
/// prevSlow && currFast > currSlow` for BUY (and the mirror for SELL); a
/// tie at `i` (`fast == slow`) is never itself a crossover.
pub struct MaCrossoverStrategy {
    config: MaCrossoverConfig,
}

impl MaCrossoverStrategy {
    pub fn new(config: MaCrossoverConfig) -> Self {
        Self { config }
    }
}

fn moving_average(kind: MaKind, closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    match kind {
        MaKind::Sma => Ok(sma(closes, period)?),
        MaKind::Ema => Ok(ema(closes, period)?),
    }
}

impl Strategy for MaCrossoverStrategy {
    fn name(&self) -> &str {
        "ma-crossover"
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn indicator_names(&self) -> &[&str] {
        &["fast_ma", "slow_ma", "adx", "atr"]
    }

    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>> {
        let needed = self.config.slow_period.max(
            self.config
                .adx_gate
                .map(|(p, _)| 2 * p)
                .unwrap_or(0)
                .max(self.config.atr_stop.map(|a| a.period).unwrap_or(0)),
        );
        if bars.len() < needed {
            return Err(StrategyError::InsufficientData { needed, got: bars.len() });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

        let fast = moving_average(self.config.kind, &closes, self.config.fast_period)?;
        let slow = moving_average(self.config.kind, &closes, self.config.slow_period)?;

        let adx_series = match self.config.adx_gate {
            Some((period, _)) => Some(adx(&highs, &lows, &closes, period)?),
            None => None,
        };
        let atr_series = match self.config.atr_stop {
            Some(cfg) => Some(atr(&highs, &lows, &closes, cfg.period)?),
            None => None,
        };

        let mut signals = Vec::new();
        let mut cap = self.config.daily_trade_cap.map(DailyTradeCap::new);

        // `prev` holds the last fully-defined `(fast, slow)` pair. It starts
        // `None` through both MAs' warm-up and is seeded, not compared,
        // at the first index where both become defined — so a fast MA that
        // is already above the slow MA the moment the slow MA's warm-up
        // completes registers as a cross there, rather than being missed
        // because there is no earlier defined pair to compare against.
        let mut prev: Option<(f64, f64)> = None;

        for i in 0..bars.len() {
            let (cur_fast, cur_slow) = match (fast[i], slow[i]) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };

            let (crossed_up, crossed_down) = match prev {
                Some((prev_fast, prev_slow)) => (
                    prev_fast <= prev_slow && cur_fast > cur_slow,
                    prev_fast >= prev_slow && cur_fast < cur_slow,
                ),
                None => (cur_fast > cur_slow, cur_fast < cur_slow),
            };
            prev = Some((cur_fast, cur_slow));

            if !crossed_up && !crossed_down {
                continue;
            }

            let bar = &bars[i];
            let mut snapshot = IndicatorSnapshot::new();
            snapshot.insert("fast_ma", SnapshotValue::Number(cur_fast));
            snapshot.insert("slow_ma", SnapshotValue::Number(cur_slow));

            if crossed_up {
                if !within_trading_window(bar.timestamp, self.config.trading_window.0, self.config.trading_window.1) {
                    continue;
                }
                if let Some((skip_start, skip_end)) = self.config.skip_window {
                    if !outside_skip_window(bar.timestamp, skip_start, skip_end) {
                        continue;
                    }
                }
                if let Some(min_gap) = self.config.ema_gap_min {
                    if !ema_gap_satisfied(cur_fast, cur_slow, min_gap) {
                        continue;
                    }
                }
                if let Some((_, threshold)) = self.config.adx_gate {
                    let adx_value = adx_series.as_ref().and_then(|s| s[i]);
                    snapshot.insert("adx", SnapshotValue::Number(adx_value.unwrap_or(f64::NAN)));
                    if !adx_gate_satisfied(adx_value, threshold) {
                        continue;
                    }
                }
                if let Some(cap) = cap.as_mut() {
                    if !cap.can_enter(bar.timestamp) {
                        continue;
                    }
                }

                let mut signal = Signal::buy(bar.timestamp, bar.close);
                if let Some(stop_cfg) = self.config.atr_stop {
                    if let Some(atr_value) = atr_series.as_ref().and_then(|s| s[i]) {
                        snapshot.insert("atr", SnapshotValue::Number(atr_value));
                        signal = signal
                            .with_stop_loss(bar.close - stop_cfg.sl_mult * atr_value)
                            .with_take_profit(bar.close + stop_cfg.tp_mult * atr_value);
                    }
                }
                signals.push(signal.with_indicators(snapshot));
                if let Some(cap) = cap.as_mut() {
                    cap.record_entry(bar.timestamp);
                }
            } else {
                // Exits ignore the trading window, skip window, and daily cap
                // (spec.md §4.3 common filters: "exits do not count"/"exits
                // ignore this window"). The simple variant relies on this SELL
                // alone to close; the simulator silently drops it if flat.
                signals.push(Signal::sell(bar.timestamp, bar.close).with_indicators(snapshot));
            }
        }

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar { timestamp: ts, open: close - 0.1, high: close + 0.1, low: close - 0.1, close, volume: 100.0 }
    }

    const MARKET_OPEN_TS: i64 = 4 * 3600; // 09:30 IST

    #[test]
    fn s1_single_crossover_pair_signal_only() {
        let closes = [100.0, 100.0, 100.0, 100.0, 102.0, 102.0, 102.0, 102.0, 105.0, 103.0, 101.0, 99.0];
        let bars: Vec<Bar> = closes.iter().enumerate().map(|(i, &c)| bar(MARKET_OPEN_TS + i as i64 * 60, c)).collect();

        let strategy = MaCrossoverStrategy::new(MaCrossoverConfig { fast_period: 3, slow_period: 5, ..MaCrossoverConfig::default() });
        let signals = strategy.generate_signals(&bars).unwrap();

        assert!(signals.iter().any(|s| s.side == crate::data::Side::Buy));
        assert!(signals.iter().any(|s| s.side == crate::data::Side::Sell));
        for s in &signals {
            assert!(s.stop_loss.is_none());
            assert!(s.take_profit.is_none());
        }
    }

    #[test]
    fn tie_at_crossover_index_is_not_a_crossover() {
        // fast == slow exactly at i: prev_fast <= prev_slow is true but
        // cur_fast > cur_slow is false, so no BUY should fire there.
        let closes = [100.0, 100.0, 100.0, 100.0, 100.0];
        let bars: Vec<Bar> = closes.iter().enumerate().map(|(i, &c)| bar(MARKET_OPEN_TS + i as i64 * 60, c)).collect();
        let strategy = MaCrossoverStrategy::new(MaCrossoverConfig { fast_period: 2, slow_period: 3, ..MaCrossoverConfig::default() });
        let signals = strategy.generate_signals(&bars).unwrap();
        assert!(signals.is_empty());
    }

    #[test]
    fn rich_variant_attaches_atr_stop_loss_and_take_profit() {
        let closes = [100.0, 100.0, 100.0, 100.0, 102.0, 103.0, 104.0, 105.0];
        let bars: Vec<Bar> = closes.iter().enumerate().map(|(i, &c)| bar(MARKET_OPEN_TS + i as i64 * 60, c)).collect();
        let strategy = MaCrossoverStrategy::new(MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
            atr_stop: Some(AtrStopConfig { period: 3, sl_mult: 1.0, tp_mult: 2.0 }),
            ..MaCrossoverConfig::default()
        });
        let signals = strategy.generate_signals(&bars).unwrap();
        let buy = signals.iter().find(|s| s.side == crate::data::Side::Buy);
        if let Some(buy) = buy {
            assert!(buy.stop_loss.is_some());
            assert!(buy.take_profit.is_some());
        }
    }

    #[test]
    fn insufficient_data_is_surfaced_not_panicked() {
        let bars = vec![bar(MARKET_OPEN_TS, 100.0)];
        let strategy = MaCrossoverStrategy::new(MaCrossoverConfig { fast_period: 3, slow_period: 5, ..MaCrossoverConfig::default() });
        assert!(strategy.generate_signals(&bars).is_err());
    }
}
