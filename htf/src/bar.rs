use serde::{Deserialize, Serialize};

use crate::error::{HtfError, Result};

/// One minute-resolution OHLC observation. Timestamps are seconds since the
/// Unix epoch; a bar stream must be strictly non-decreasing in `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Boundary validation: `low <= open, close <= high`, `low <= high`, `volume >= 0`,
    /// and no NaN/infinite fields. Collaborators are expected to run this before
    /// handing bars to the pipeline — see spec.md §7 on `DegenerateInput`.
    pub fn validate(&self) -> Result<()> {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(HtfError::DegenerateBar(format!("non-finite field in bar at {}", self.timestamp)));
        }
        if self.volume < 0.0 {
            return Err(HtfError::DegenerateBar(format!("negative volume in bar at {}", self.timestamp)));
        }
        if self.low > self.open || self.low > self.close || self.open > self.high || self.close > self.high || self.low > self.high {
            return Err(HtfError::DegenerateBar(format!("inconsistent OHLC in bar at {}", self.timestamp)));
        }
        Ok(())
    }
}

/// Validates that `bars` is strictly non-decreasing in timestamp and every
/// bar individually passes [`Bar::validate`].
pub fn validate_series(bars: &[Bar]) -> Result<()> {
    let mut prev: Option<i64> = None;
    for bar in bars {
        bar.validate()?;
        if let Some(p) = prev {
            if bar.timestamp < p {
                return Err(HtfError::NonMonotonicTimestamp { prev: p, next: bar.timestamp });
            }
        }
        prev = Some(bar.timestamp);
    }
    Ok(())
}

/// A higher-timeframe bar folded from one or more minute bars.
///
/// `complete` is `true` once a later minute bar has crossed past `end_time`;
/// the aggregator guarantees an incomplete bar is never placed where a
/// [`crate::LastCompletedHtfView`] can see it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HtfBar {
    pub start_time: i64,
    pub end_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub complete: bool,
}

impl HtfBar {
    pub(crate) fn open_at(bar: &Bar, start_time: i64, end_time: i64) -> Self {
        HtfBar {
            start_time,
            end_time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            complete: false,
        }
    }

    pub(crate) fn absorb(&mut self, bar: &Bar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
    }
}
