use indicators::ema;

use crate::bar::HtfBar;
use crate::error::Result;

/// Precomputes an EMA over a completed-HTF-bar close series, using the same
/// batch routine the minute-resolution indicators use. Strategies combine
/// `(htfClose, htfEma)` at the index [`crate::LastCompletedHtfView::last_completed`]
/// returns for "is HTF bullish?" checks.
pub fn htf_ema_series(bars: &[HtfBar], period: usize) -> Result<Vec<Option<f64>>> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    ema(&closes, period).map_err(|e| crate::error::HtfError::DegenerateBar(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(start: i64, end: i64, close: f64) -> HtfBar {
        HtfBar {
            start_time: start,
            end_time: end,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
            complete: true,
        }
    }

    #[test]
    fn matches_plain_ema_over_closes() {
        let bars: Vec<HtfBar> = (0..5).map(|i| bar(i, i + 1, 100.0 + i as f64)).collect();
        let series = htf_ema_series(&bars, 3).unwrap();
        assert_eq!(series.len(), 5);
        assert!(series[0].is_none());
        assert!(series[2].is_some());
    }
}
