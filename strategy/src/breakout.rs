//! Multi-timeframe breakout strategy (spec.md §4.3.c): entry on a close that
//! clears the previous hourly/daily/weekly(/monthly) high simultaneously,
//! with an optional ADX gate computed strictly from completed HTF candles.
//!
//! Grounded in the teacher's `day_trade::strategies::breakout` rolling-window
//! extrema tracking, generalised from a single daily window to the four
//! nested HTF windows spec.md adds, and rebuilt on top of [`HtfAggregator`]
//! rather than hand-rolled bucket bookkeeping.
//!
//! The engine's [`crate::data::Signal`] side only has `Buy`/`Sell` and the
//! simulator only ever holds a long [`simulator::Position`] — there is no
//! short-position concept anywhere in the data model. Spec.md's "symmetric
//! for SHORT" breakout condition is therefore implemented here as the SELL
//! signal that closes an open long, not as a genuine short entry.

use indicators::Adx;
use serde::{Deserialize, Serialize};

use htf::{HtfAggregator, HtfInterval};

use crate::data::{Bar, IndicatorSnapshot, Signal, SnapshotValue};
use crate::error::{Result, StrategyError};
use crate::filters::ReentryGuard;
use crate::strategy::Strategy;

/// Which previous-level terms gate entry. `Wdh` (week/day/hour) omits the
/// monthly term; `Full` requires all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakoutVariant {
    Full,
    Wdh,
}

/// Which completed HTF series the optional ADX gate is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtfAdxTimeframe {
    Hourly,
    Daily,
}

/// Optional ADX gate computed strictly from completed HTF candles — the
/// in-progress candle for the gate's timeframe never contributes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HtfAdxGateConfig {
    pub timeframe: HtfAdxTimeframe,
    pub period: usize,
    pub threshold: f64,
}

/// Plain-data configuration for [`MultiTimeframeBreakoutStrategy`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MultiTimeframeBreakoutConfig {
    pub variant: BreakoutVariant,
    /// Reward-to-risk multiple applied to `entry - stopLoss` for the take-profit.
    pub rr: f64,
    pub adx_gate: Option<HtfAdxGateConfig>,
}

impl Default for MultiTimeframeBreakoutConfig {
    fn default() -> Self {
        Self { variant: BreakoutVariant::Full, rr: 2.0, adx_gate: None }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Extrema {
    high: f64,
    low: f64,
}

/// Rolling current/previous high-low window for one HTF timeframe, backed by
/// an [`HtfAggregator`]: "roll current→previous and reset current" is just
/// what `HtfAggregator::push` already does on a period boundary.
struct Window {
    agg: HtfAggregator,
    previous: Option<Extrema>,
}

impl Window {
    fn new(interval: HtfInterval) -> Self {
        Self { agg: HtfAggregator::new(interval), previous: None }
    }

    /// Feeds one minute bar; updates `previous` if a period just completed.
    fn push(&mut self, bar: &Bar) {
        if let Some(completed) = self.agg.push(bar) {
            self.previous = Some(Extrema { high: completed.high, low: completed.low });
        }
    }
}

/// Multi-timeframe breakout strategy. Entry LONG fires the first bar whose
/// close simultaneously clears the previous hourly, daily, and weekly high
/// (and, for [`BreakoutVariant::Full`], the previous monthly high too). A
/// symmetric break of the corresponding lows closes the long. Re-entry is
/// blocked until price pulls back below at least one of the levels that
/// gated the last entry. SL = previous hourly low; TP = `entry + rr *
/// (entry - SL)`.
pub struct MultiTimeframeBreakoutStrategy {
    config: MultiTimeframeBreakoutConfig,
}

impl MultiTimeframeBreakoutStrategy {
    pub fn new(config: MultiTimeframeBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MultiTimeframeBreakoutStrategy {
    fn name(&self) -> &str {
        "multi-timeframe-breakout"
    }

    fn version(&self) -> &str {
        "1.0"
    }

    fn indicator_names(&self) -> &[&str] {
        &["prev_1h_high", "prev_1h_low", "prev_day_high", "prev_week_high", "prev_month_high", "htf_adx"]
    }

    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>> {
        if bars.is_empty() {
            return Err(StrategyError::InsufficientData { needed: 1, got: 0 });
        }

        let mut hourly = Window::new(HtfInterval::FixedSeconds(3600));
        let mut daily = Window::new(HtfInterval::Daily);
        let mut weekly = Window::new(HtfInterval::Weekly);
        let mut monthly = Window::new(HtfInterval::Monthly);

        let mut gate_agg = self.config.adx_gate.map(|g| {
            HtfAggregator::new(match g.timeframe {
                HtfAdxTimeframe::Hourly => HtfInterval::FixedSeconds(3600),
                HtfAdxTimeframe::Daily => HtfInterval::Daily,
            })
        });
        let mut gate_adx = match self.config.adx_gate {
            Some(g) => Some(Adx::new(g.period)?),
            None => None,
        };
        let mut htf_adx_value: Option<f64> = None;

        let mut signals = Vec::new();
        let mut in_position = false;
        let mut guard = ReentryGuard::new();

        for bar in bars {
            hourly.push(bar);
            daily.push(bar);
            weekly.push(bar);
            monthly.push(bar);

            if let (Some(agg), Some(adx_ind)) = (gate_agg.as_mut(), gate_adx.as_mut()) {
                if let Some(completed) = agg.push(bar) {
                    htf_adx_value = adx_ind.update(completed.high, completed.low, completed.close);
                }
            }

            let (Some(h1), Some(d1), Some(w1)) = (hourly.previous, daily.previous, weekly.previous) else {
                continue;
            };
            let m1 = monthly.previous;

            let mut snapshot = IndicatorSnapshot::new();
            snapshot.insert("prev_1h_high", SnapshotValue::Number(h1.high));
            snapshot.insert("prev_1h_low", SnapshotValue::Number(h1.low));
            snapshot.insert("prev_day_high", SnapshotValue::Number(d1.high));
            snapshot.insert("prev_week_high", SnapshotValue::Number(w1.high));
            if let Some(m1) = m1 {
                snapshot.insert("prev_month_high", SnapshotValue::Number(m1.high));
            }
            if let Some(adx_value) = htf_adx_value {
                snapshot.insert("htf_adx", SnapshotValue::Number(adx_value));
            }

            if in_position {
                let broke_down = bar.close < h1.low
                    || bar.close < d1.low
                    || bar.close < w1.low
                    || matches!((self.config.variant, m1), (BreakoutVariant::Full, Some(m1)) if bar.close < m1.low);
                if broke_down {
                    signals.push(Signal::sell(bar.timestamp, bar.close).with_indicators(snapshot.clone()));
                    in_position = false;
                }
                let pullback = bar.close < h1.high || bar.close < d1.high || bar.close < w1.high;
                guard.unblock_if(pullback);
                continue;
            }

            let monthly_ok = match self.config.variant {
                BreakoutVariant::Full => m1.is_some_and(|m1| bar.close > m1.high),
                BreakoutVariant::Wdh => true,
            };
            let broke_up = bar.close > h1.high && bar.close > d1.high && bar.close > w1.high && monthly_ok;

            let pullback = bar.close < h1.high || bar.close < d1.high || bar.close < w1.high;
            guard.unblock_if(pullback);

            if !broke_up || !guard.can_enter() {
                continue;
            }
            if let Some(gate) = self.config.adx_gate {
                if !htf_adx_value.is_some_and(|v| v >= gate.threshold) {
                    continue;
                }
            }

            let entry = bar.close;
            let stop_loss = h1.low;
            let take_profit = entry + self.config.rr * (entry - stop_loss);

            signals.push(
                Signal::buy(bar.timestamp, entry)
                    .with_stop_loss(stop_loss)
                    .with_take_profit(take_profit)
                    .with_indicators(snapshot),
            );
            in_position = true;
            guard.block();
        }

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar { timestamp: ts, open, high, low, close, volume: 100.0 }
    }

    #[test]
    fn empty_series_is_an_error_not_a_panic() {
        let strategy = MultiTimeframeBreakoutStrategy::new(MultiTimeframeBreakoutConfig::default());
        assert!(strategy.generate_signals(&[]).is_err());
    }

    #[test]
    fn wdh_variant_enters_on_breakout_without_waiting_for_monthly_history() {
        // Two calendar days of hourly-resolution bars is enough to seed
        // previous hourly/daily/weekly levels but never a previous monthly
        // one, so the Full variant could never fire here; Wdh should.
        let mut bars = Vec::new();
        let mut ts = 4 * 3600; // day 1, 09:30 IST
        for h in 0..6 {
            let px = 100.0 + h as f64;
            bars.push(bar(ts, px, px + 0.2, px - 0.2, px));
            ts += 3600;
        }
        ts = 4 * 3600 + 86_400; // day 2, 09:30 IST
        for h in 0..6 {
            let px = 100.0 + h as f64;
            bars.push(bar(ts, px, px + 0.2, px - 0.2, px));
            ts += 3600;
        }
        // Day 3: a bar that clears every prior hourly/daily/weekly high.
        bars.push(bar(ts, 110.0, 112.0, 109.5, 111.0));

        let strategy = MultiTimeframeBreakoutStrategy::new(MultiTimeframeBreakoutConfig {
            variant: BreakoutVariant::Wdh,
            ..MultiTimeframeBreakoutConfig::default()
        });
        let signals = strategy.generate_signals(&bars).unwrap();
        assert!(signals.iter().any(|s| s.side == crate::data::Side::Buy));
    }

    #[test]
    fn full_variant_withholds_entry_without_a_previous_monthly_level() {
        let mut bars = Vec::new();
        let mut ts = 4 * 3600;
        for h in 0..6 {
            let px = 100.0 + h as f64;
            bars.push(bar(ts, px, px + 0.2, px - 0.2, px));
            ts += 3600;
        }
        bars.push(bar(ts + 86_400, 110.0, 112.0, 109.5, 111.0));

        let strategy = MultiTimeframeBreakoutStrategy::new(MultiTimeframeBreakoutConfig {
            variant: BreakoutVariant::Full,
            ..MultiTimeframeBreakoutConfig::default()
        });
        let signals = strategy.generate_signals(&bars).unwrap();
        assert!(signals.iter().all(|s| s.side != crate::data::Side::Buy));
    }

    #[test]
    fn reentry_is_blocked_until_pullback() {
        let mut bars = Vec::new();
        let mut ts = 4 * 3600;
        for h in 0..6 {
            let px = 100.0 + h as f64;
            bars.push(bar(ts, px, px + 0.2, px - 0.2, px));
            ts += 3600;
        }
        ts += 86_400 - 6 * 3600;
        // Breakout bar, then an immediate exit break, then a second breakout
        // bar at the same level without any pullback below the highs first —
        // re-entry should stay blocked since close never drops below a
        // previous high after the guard is set on the first entry's exit.
        bars.push(bar(ts, 110.0, 112.0, 109.5, 111.0));
        ts += 3600;
        bars.push(bar(ts, 111.0, 111.2, 90.0, 95.0)); // breaks every low -> SELL
        ts += 3600;
        bars.push(bar(ts, 111.0, 113.0, 110.5, 112.0)); // re-breaks the high again

        let strategy = MultiTimeframeBreakoutStrategy::new(MultiTimeframeBreakoutConfig {
            variant: BreakoutVariant::Wdh,
            ..MultiTimeframeBreakoutConfig::default()
        });
        let signals = strategy.generate_signals(&bars).unwrap();
        let buys = signals.iter().filter(|s| s.side == crate::data::Side::Buy).count();
        assert_eq!(buys, 1);
    }
}
