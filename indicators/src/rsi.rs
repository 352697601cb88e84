use crate::error::{IndicatorError, Result};

/// Wilder-smoothed relative strength index.
///
/// Needs `period` price changes to seed its average gain/loss, so against a
/// price series it is first defined at index `period` (zero-based) — one
/// past the warm-up index of the moving averages, since RSI operates on
/// differences rather than levels.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_price: Option<f64>,
    changes_seen: usize,
    gain_sum: f64,
    loss_sum: f64,
    avg_gain: Option<f64>,
    avg_loss: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self> {
        if period < 1 {
            return Err(IndicatorError::InvalidPeriod { min: 1, got: period });
        }
        Ok(Self {
            period,
            prev_price: None,
            changes_seen: 0,
            gain_sum: 0.0,
            loss_sum: 0.0,
            avg_gain: None,
            avg_loss: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, price: f64) -> Option<f64> {
        if let Some(prev) = self.prev_price {
            let change = price - prev;
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);

            match (self.avg_gain, self.avg_loss) {
                (Some(prev_gain), Some(prev_loss)) => {
                    let n = self.period as f64;
                    self.avg_gain = Some((prev_gain * (n - 1.0) + gain) / n);
                    self.avg_loss = Some((prev_loss * (n - 1.0) + loss) / n);
                }
                _ => {
                    self.gain_sum += gain;
                    self.loss_sum += loss;
                    self.changes_seen += 1;
                    if self.changes_seen == self.period {
                        self.avg_gain = Some(self.gain_sum / self.period as f64);
                        self.avg_loss = Some(self.loss_sum / self.period as f64);
                    }
                }
            }
        }
        self.prev_price = Some(price);
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        match (self.avg_gain, self.avg_loss) {
            (Some(avg_gain), Some(avg_loss)) => {
                if avg_loss == 0.0 {
                    Some(100.0)
                } else {
                    let rs = avg_gain / avg_loss;
                    Some(100.0 - 100.0 / (1.0 + rs))
                }
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.prev_price = None;
        self.changes_seen = 0;
        self.gain_sum = 0.0;
        self.loss_sum = 0.0;
        self.avg_gain = None;
        self.avg_loss = None;
    }
}

/// Batch form: folds [`Rsi::update`] over `series`.
pub fn rsi(series: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut ind = Rsi::new(period)?;
    Ok(series.iter().map(|&v| ind.update(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warms_up_at_period_index() {
        let series = [44.0, 44.25, 44.5, 43.75, 44.5, 44.0];
        let mut ind = Rsi::new(3).unwrap();
        let out: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert!(out[3].is_some());
    }

    #[test]
    fn all_gains_saturates_at_100() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut ind = Rsi::new(2).unwrap();
        let out: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();
        assert_relative_eq!(out.last().unwrap().unwrap(), 100.0);
    }

    #[test]
    fn batch_matches_incremental() {
        let series = [44.0, 44.25, 44.5, 43.75, 44.5, 44.0, 44.15];
        let batch = rsi(&series, 3).unwrap();
        let mut ind = Rsi::new(3).unwrap();
        let folded: Vec<Option<f64>> = series.iter().map(|&v| ind.update(v)).collect();
        assert_eq!(batch, folded);
    }
}
