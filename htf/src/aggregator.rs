use chrono::{Datelike, NaiveDate, Weekday};

use crate::bar::{Bar, HtfBar};
use crate::time::ist_date;

/// How minute bars are folded into a higher-timeframe bar.
///
/// `FixedSeconds` covers hourly (3600) and fixed-session (300 * 60 = 18000,
/// i.e. the 09:30–14:30 session) candles: boundaries are `floor(ts /
/// interval) * interval`. `Daily`/`Weekly`/`Monthly` are calendar-based in
/// IST rather than epoch-aligned, since a fixed 86,400s step would land on
/// UTC midnight rather than an IST calendar-day boundary — this is what the
/// multi-timeframe breakout strategy's daily extrema are grounded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtfInterval {
    FixedSeconds(i64),
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodKey {
    Fixed(i64),
    Day(NaiveDate),
    Week(NaiveDate),
    Month(i32, u32),
}

/// Folds a chronologically ordered minute stream into higher-timeframe bars.
///
/// `push` returns the bar that just completed, if the new minute bar crossed
/// a period boundary. The in-progress bar is never returned by `push` itself
/// — callers collect completed bars into a [`crate::LastCompletedHtfView`],
/// which by construction cannot expose the tail's incomplete bar.
#[derive(Debug, Clone)]
pub struct HtfAggregator {
    interval: HtfInterval,
    current: Option<HtfBar>,
    current_key: Option<PeriodKey>,
    week_anchor: Option<Weekday>,
    current_week_start: Option<NaiveDate>,
}

impl HtfAggregator {
    pub fn new(interval: HtfInterval) -> Self {
        Self {
            interval,
            current: None,
            current_key: None,
            week_anchor: None,
            current_week_start: None,
        }
    }

    /// A new week begins the next time the bar stream reaches the same
    /// weekday as the very first bar ever fed to this aggregator, on a later
    /// calendar date.
    fn week_key(&mut self, bar: &Bar) -> PeriodKey {
        let date = ist_date(bar.timestamp);
        let anchor = *self.week_anchor.get_or_insert(date.weekday());

        match self.current_week_start {
            None => {
                self.current_week_start = Some(date);
            }
            Some(start) if date.weekday() == anchor && date != start => {
                self.current_week_start = Some(date);
            }
            _ => {}
        }

        PeriodKey::Week(self.current_week_start.expect("just set above"))
    }

    fn key_for(&mut self, bar: &Bar) -> PeriodKey {
        match self.interval {
            HtfInterval::FixedSeconds(step) => PeriodKey::Fixed(bar.timestamp.div_euclid(step) * step),
            HtfInterval::Daily => PeriodKey::Day(ist_date(bar.timestamp)),
            HtfInterval::Monthly => {
                let date = ist_date(bar.timestamp);
                PeriodKey::Month(date.year(), date.month())
            }
            HtfInterval::Weekly => self.week_key(bar),
        }
    }

    fn open_new_bucket(&mut self, bar: &Bar, key: PeriodKey) {
        let start_time = match key {
            PeriodKey::Fixed(start) => start,
            PeriodKey::Day(_) | PeriodKey::Week(_) | PeriodKey::Month(_, _) => bar.timestamp,
        };
        let end_time = match self.interval {
            HtfInterval::FixedSeconds(step) => start_time + step,
            _ => start_time,
        };
        let mut fresh = HtfBar::open_at(bar, start_time, end_time);
        fresh.complete = false;
        self.current = Some(fresh);
        self.current_key = Some(key);
    }

    /// Feeds one minute bar. Returns the just-completed HTF bar if `bar`
    /// crossed into a new period.
    pub fn push(&mut self, bar: &Bar) -> Option<HtfBar> {
        let key = self.key_for(bar);

        match (self.current, self.current_key) {
            (Some(mut cur), Some(prev_key)) if prev_key == key => {
                cur.absorb(bar);
                self.current = Some(cur);
                None
            }
            (Some(cur), _) => {
                let mut completed = cur;
                completed.end_time = bar.timestamp;
                completed.complete = true;
                self.open_new_bucket(bar, key);
                Some(completed)
            }
            (None, _) => {
                self.open_new_bucket(bar, key);
                None
            }
        }
    }

    /// The in-progress bar, if any. Intentionally crate-private: the only
    /// supported external read path is the completed-bar history gathered
    /// from `push`'s return values, via [`crate::LastCompletedHtfView`].
    pub(crate) fn current(&self) -> Option<&HtfBar> {
        self.current.as_ref()
    }
}
