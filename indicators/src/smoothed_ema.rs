use crate::ema::Ema;
use crate::error::{IndicatorError, Result};
use crate::sma::Sma;

/// A simple average of the trailing `smoothing_period` values of an
/// underlying EMA(`ema_period`) — used to damp EMA noise for gap and trend
/// filters without introducing a second independent lag parameter.
///
/// First defined at warm-up index `ema_period + smoothing_period - 2`.
#[derive(Debug, Clone)]
pub struct SmoothedEma {
    ema: Ema,
    smoothing: Sma,
}

impl SmoothedEma {
    pub fn new(ema_period: usize, smoothing_period: usize) -> Result<Self> {
        if smoothing_period < 1 {
            return Err(IndicatorError::InvalidSmoothingPeriod {
                min: 1,
                got: smoothing_period,
            });
        }
        Ok(Self {
            ema: Ema::new(ema_period)?,
            smoothing: Sma::new(smoothing_period)?,
        })
    }

    pub fn update(&mut self, value: f64) -> Option<f64> {
        match self.ema.update(value) {
            Some(ema_value) => self.smoothing.update(ema_value),
            None => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.smoothing.value()
    }

    pub fn reset(&mut self) {
        self.ema.reset();
        self.smoothing.reset();
    }
}

/// Batch form: folds [`SmoothedEma::update`] over `series`.
pub fn smoothed_ema(
    series: &[f64],
    ema_period: usize,
    smoothing_period: usize,
) -> Result<Vec<Option<f64>>> {
    let mut ind = SmoothedEma::new(ema_period, smoothing_period)?;
    Ok(series.iter().map(|&v| ind.update(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warms_up_at_combined_period() {
        let mut ind = SmoothedEma::new(3, 2).unwrap();
        let series = [1.0, 2.0, 3.0, 6.0, 4.0];
        let out: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();
        // ema(3) warms at index 2, smoothing(2) then needs one more ema value -> index 3
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert!(out[3].is_some());
        assert!(out[4].is_some());
    }

    #[test]
    fn batch_matches_incremental() {
        let series = [1.0, 2.0, 3.0, 6.0, 4.0, 9.0, 5.0];
        let batch = smoothed_ema(&series, 3, 2).unwrap();
        let mut ind = SmoothedEma::new(3, 2).unwrap();
        let folded: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();
        assert_eq!(batch, folded);
    }
}
