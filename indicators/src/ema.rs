use crate::error::{IndicatorError, Result};
use crate::sma::Sma;

/// Exponential moving average, seeded with a simple average of the first
/// `period` values and then recurred with multiplier `2 / (period + 1)`.
///
/// First defined at warm-up index `period - 1`, same as [`crate::Sma`].
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    seed: Sma,
    current: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self> {
        if period < 1 {
            return Err(IndicatorError::InvalidPeriod { min: 1, got: period });
        }
        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed: Sma::new(period)?,
            current: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, value: f64) -> Option<f64> {
        match self.current {
            Some(prev) => {
                let next = (value - prev) * self.multiplier + prev;
                self.current = Some(next);
            }
            None => {
                if let Some(seeded) = self.seed.update(value) {
                    self.current = Some(seeded);
                }
            }
        }
        self.current
    }

    pub fn value(&self) -> Option<f64> {
        self.current
    }

    pub fn reset(&mut self) {
        self.seed.reset();
        self.current = None;
    }
}

/// Batch form: folds [`Ema::update`] over `series`.
pub fn ema(series: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut ind = Ema::new(period)?;
    Ok(series.iter().map(|&v| ind.update(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn seeds_with_simple_average_then_recurs() {
        let mut ind = Ema::new(3).unwrap();
        assert_eq!(ind.update(1.0), None);
        assert_eq!(ind.update(2.0), None);
        let seeded = ind.update(3.0).unwrap();
        assert_relative_eq!(seeded, 2.0);

        let next = ind.update(6.0).unwrap();
        // multiplier = 2/4 = 0.5 -> (6 - 2) * 0.5 + 2 = 4.0
        assert_relative_eq!(next, 4.0);
    }

    #[test]
    fn batch_matches_incremental() {
        let series = [1.0, 2.0, 3.0, 6.0, 4.0, 9.0];
        let batch = ema(&series, 3).unwrap();
        let mut ind = Ema::new(3).unwrap();
        let folded: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();
        assert_eq!(batch, folded);
    }

    #[test]
    fn reset_clears_state() {
        let mut ind = Ema::new(2).unwrap();
        ind.update(1.0);
        ind.update(2.0);
        assert!(ind.value().is_some());
        ind.reset();
        assert_eq!(ind.value(), None);
    }
}
