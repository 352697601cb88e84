use std::collections::VecDeque;

use crate::error::{IndicatorError, Result};

/// Simple moving average over a trailing window of `period` values.
///
/// First defined once `period` values have been fed in (warm-up index
/// `period - 1`, zero-based against the input series).
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        if period < 1 {
            return Err(IndicatorError::InvalidPeriod { min: 1, got: period });
        }
        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed one more value and return the current average, if warmed up.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.period {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.values.len() == self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Batch form: folds [`Sma::update`] over `series`, guaranteeing the same
/// output an incremental caller would see bar by bar.
pub fn sma(series: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut ind = Sma::new(period)?;
    Ok(series.iter().map(|&v| ind.update(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warms_up_after_period_values() {
        let mut ind = Sma::new(3).unwrap();
        assert_eq!(ind.update(1.0), None);
        assert_eq!(ind.update(2.0), None);
        assert_relative_eq!(ind.update(3.0).unwrap(), 2.0);
        assert_relative_eq!(ind.update(6.0).unwrap(), 11.0 / 3.0);
    }

    #[test]
    fn rejects_zero_period() {
        assert!(Sma::new(0).is_err());
    }

    #[test]
    fn batch_matches_incremental() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let batch = sma(&series, 3).unwrap();

        let mut ind = Sma::new(3).unwrap();
        let folded: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();

        assert_eq!(batch, folded);
        assert_eq!(batch[0], None);
        assert_eq!(batch[1], None);
        assert_relative_eq!(batch[2].unwrap(), 2.0);
    }

    #[test]
    fn reset_clears_state() {
        let mut ind = Sma::new(2).unwrap();
        ind.update(1.0);
        ind.update(2.0);
        assert!(ind.value().is_some());
        ind.reset();
        assert_eq!(ind.value(), None);
        assert_eq!(ind.update(5.0), None);
    }
}
