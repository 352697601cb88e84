use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use simulator::Trade;

/// `(YYYY, month, day)` by IST entry timestamp.
pub fn day_key(trade: &Trade) -> (i32, u32, u32) {
    htf::ist_date_key(trade.entry_time)
}

/// Year plus a non-ISO week ordinal anchored on the calendar year's January 1
/// — `(date - Jan 1) / 7` — preserved from the source rather than aligned to
/// ISO 8601 weeks (flagged, not fixed, per the design notes).
pub fn week_key(trade: &Trade) -> (i32, u32) {
    let date = htf::ist_date(trade.entry_time);
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("january 1st always exists");
    let days_since_jan1 = (date - jan1).num_days().max(0);
    (date.year(), (days_since_jan1 / 7) as u32)
}

/// `(YYYY, month)` by IST entry timestamp.
pub fn month_key(trade: &Trade) -> (i32, u32) {
    let date = htf::ist_date(trade.entry_time);
    (date.year(), date.month())
}

/// `(YYYY, quarter in 1..=4)`. The source's `floor(month/3)+1` formula
/// assumes a zero-indexed month (as in the source language's date API); with
/// chrono's one-indexed `month()` the equivalent is `floor((month-1)/3)+1`,
/// which is what keeps December in quarter 4 instead of an out-of-range 5.
pub fn quarter_key(trade: &Trade) -> (i32, u32) {
    let date = htf::ist_date(trade.entry_time);
    let quarter = (date.month() - 1) / 3 + 1;
    (date.year(), quarter)
}

/// `YYYY` by IST entry timestamp.
pub fn year_key(trade: &Trade) -> i32 {
    htf::ist_date(trade.entry_time).year()
}

/// Groups trades by `key_fn`, preserving each group's entry-time order
/// (trades are assumed to already be in entry-time order in `trades`).
pub fn group_by<K: Ord, F: Fn(&Trade) -> K>(trades: &[Trade], key_fn: F) -> BTreeMap<K, Vec<&Trade>> {
    let mut groups: BTreeMap<K, Vec<&Trade>> = BTreeMap::new();
    for trade in trades {
        groups.entry(key_fn(trade)).or_default().push(trade);
    }
    groups
}
