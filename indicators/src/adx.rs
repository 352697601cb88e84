use crate::error::{IndicatorError, Result};

/// Wilder's average directional index, tracking directional movement and
/// true range smoothing internally and deriving `+DI`/`-DI`/`DX` on the way
/// to the final smoothed ADX.
///
/// Directional movement and true range are smoothed as running sums (seeded
/// with the sum of the first `period` values, then carried forward with
/// Wilder's `sum - sum/period + new` recurrence); ADX itself is a true
/// average, seeded with the mean of the first `period` DX values. The
/// combined warm-up is therefore index `2 * period - 1`.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    prev_high: Option<f64>,
    prev_low: Option<f64>,
    prev_close: Option<f64>,

    dm_plus_sum: f64,
    dm_minus_sum: f64,
    tr_sum: f64,
    seed_count: usize,

    smoothed_dm_plus: Option<f64>,
    smoothed_dm_minus: Option<f64>,
    smoothed_tr: Option<f64>,

    dx_sum: f64,
    dx_count: usize,
    adx: Option<f64>,
}

impl Adx {
    pub fn new(period: usize) -> Result<Self> {
        if period < 1 {
            return Err(IndicatorError::InvalidPeriod { min: 1, got: period });
        }
        Ok(Self {
            period,
            prev_high: None,
            prev_low: None,
            prev_close: None,
            dm_plus_sum: 0.0,
            dm_minus_sum: 0.0,
            tr_sum: 0.0,
            seed_count: 0,
            smoothed_dm_plus: None,
            smoothed_dm_minus: None,
            smoothed_tr: None,
            dx_sum: 0.0,
            dx_count: 0,
            adx: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        if let (Some(prev_high), Some(prev_low), Some(prev_close)) =
            (self.prev_high, self.prev_low, self.prev_close)
        {
            let up_move = high - prev_high;
            let down_move = prev_low - low;
            let plus_dm = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
            let minus_dm = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
            let tr = (high - low)
                .max((high - prev_close).abs())
                .max((low - prev_close).abs());

            match (self.smoothed_dm_plus, self.smoothed_dm_minus, self.smoothed_tr) {
                (Some(sdp), Some(sdm), Some(str_)) => {
                    let n = self.period as f64;
                    self.smoothed_dm_plus = Some(sdp - sdp / n + plus_dm);
                    self.smoothed_dm_minus = Some(sdm - sdm / n + minus_dm);
                    self.smoothed_tr = Some(str_ - str_ / n + tr);
                }
                _ => {
                    self.dm_plus_sum += plus_dm;
                    self.dm_minus_sum += minus_dm;
                    self.tr_sum += tr;
                    self.seed_count += 1;
                    if self.seed_count == self.period {
                        self.smoothed_dm_plus = Some(self.dm_plus_sum);
                        self.smoothed_dm_minus = Some(self.dm_minus_sum);
                        self.smoothed_tr = Some(self.tr_sum);
                    }
                }
            }

            if let (Some(sdp), Some(sdm), Some(str_)) =
                (self.smoothed_dm_plus, self.smoothed_dm_minus, self.smoothed_tr)
            {
                if str_ > 0.0 {
                    let plus_di = 100.0 * sdp / str_;
                    let minus_di = 100.0 * sdm / str_;
                    let di_sum = plus_di + minus_di;
                    let dx = if di_sum > 0.0 {
                        100.0 * (plus_di - minus_di).abs() / di_sum
                    } else {
                        0.0
                    };

                    match self.adx {
                        Some(prev_adx) => {
                            let n = self.period as f64;
                            self.adx = Some((prev_adx * (n - 1.0) + dx) / n);
                        }
                        None => {
                            self.dx_sum += dx;
                            self.dx_count += 1;
                            if self.dx_count == self.period {
                                self.adx = Some(self.dx_sum / self.period as f64);
                            }
                        }
                    }
                }
            }
        }

        self.prev_high = Some(high);
        self.prev_low = Some(low);
        self.prev_close = Some(close);
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        self.adx
    }

    pub fn reset(&mut self) {
        *self = Adx::new(self.period).expect("period already validated");
    }
}

/// Batch form: folds [`Adx::update`] over parallel `high`/`low`/`close` slices.
pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut ind = Adx::new(period)?;
    Ok(high
        .iter()
        .zip(low.iter())
        .zip(close.iter())
        .map(|((&h, &l), &c)| ind.update(h, l, c))
        .collect())
}
