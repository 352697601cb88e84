use crate::error::{IndicatorError, Result};

/// Wilder-smoothed average true range.
///
/// The first bar has no previous close, so its true range is excluded from
/// both the seeding average and the recurrence — seeding uses the true
/// ranges of bars `1..=period`, and the indicator is first defined at
/// warm-up index `period`.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    tr_sum: f64,
    tr_count: usize,
    atr: Option<f64>,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self> {
        if period < 1 {
            return Err(IndicatorError::InvalidPeriod { min: 1, got: period });
        }
        Ok(Self {
            period,
            prev_close: None,
            tr_sum: 0.0,
            tr_count: 0,
            atr: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        if let Some(prev_close) = self.prev_close {
            let tr = (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs());

            match self.atr {
                Some(prev_atr) => {
                    let n = self.period as f64;
                    self.atr = Some((prev_atr * (n - 1.0) + tr) / n);
                }
                None => {
                    self.tr_sum += tr;
                    self.tr_count += 1;
                    if self.tr_count == self.period {
                        self.atr = Some(self.tr_sum / self.period as f64);
                    }
                }
            }
        }
        self.prev_close = Some(close);
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        self.atr
    }

    pub fn reset(&mut self) {
        self.prev_close = None;
        self.tr_sum = 0.0;
        self.tr_count = 0;
        self.atr = None;
    }
}

/// Batch form: folds [`Atr::update`] over parallel `high`/`low`/`close` slices.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut ind = Atr::new(period)?;
    Ok(high
        .iter()
        .zip(low.iter())
        .zip(close.iter())
        .map(|((&h, &l), &c)| ind.update(h, l, c))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warms_up_at_period_index_excluding_first_bar() {
        let high = [10.0, 10.5, 11.0, 10.8, 11.2];
        let low = [9.5, 9.8, 10.2, 10.0, 10.5];
        let close = [9.8, 10.2, 10.5, 10.3, 11.0];

        let mut ind = Atr::new(3).unwrap();
        let out: Vec<Option<f64>> = (0..5).map(|i| ind.update(high[i], low[i], close[i])).collect();
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert!(out[3].is_some());
    }

    #[test]
    fn batch_matches_incremental() {
        let high = [10.0, 10.5, 11.0, 10.8, 11.2, 11.5];
        let low = [9.5, 9.8, 10.2, 10.0, 10.5, 10.9];
        let close = [9.8, 10.2, 10.5, 10.3, 11.0, 11.1];

        let batch = atr(&high, &low, &close, 3).unwrap();
        let mut ind = Atr::new(3).unwrap();
        let folded: Vec<Option<f64>> = (0..high.len())
            .map(|i| ind.update(high[i], low[i], close[i]))
            .collect();
        assert_eq!(batch, folded);
    }
}
