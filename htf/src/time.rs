//! IST (UTC+05:30) time helpers shared across the workspace.
//!
//! Minute-of-day conversion deliberately goes through a single
//! minutes-since-midnight value — `istMinute = (utcMinute + 330) mod 1440` —
//! rather than adding IST's hour and minute offsets independently, which
//! drifts around UTC-minute rollovers.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

pub const MARKET_OPEN_MINUTE: u32 = 9 * 60 + 30; // 09:30 IST
pub const FORCED_CLOSE_MINUTE: u32 = 14 * 60 + 30; // 14:30 IST
const MINUTES_PER_DAY: i64 = 1440;
const IST_OFFSET_MINUTES: i64 = 330;

/// India Standard Time, UTC+05:30, fixed year-round (no DST observed).
pub fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid fixed offset")
}

/// Converts a Unix timestamp (seconds) to its IST wall-clock datetime.
pub fn to_ist(timestamp: i64) -> DateTime<FixedOffset> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .expect("valid unix timestamp")
        .with_timezone(&ist_offset())
}

/// The IST calendar date a timestamp falls on.
pub fn ist_date(timestamp: i64) -> NaiveDate {
    to_ist(timestamp).date_naive()
}

/// IST calendar date key `(year, month, day)`.
pub fn ist_date_key(timestamp: i64) -> (i32, u32, u32) {
    use chrono::Datelike;
    let date = ist_date(timestamp);
    (date.year(), date.month(), date.day())
}

fn utc_minute_of_day(timestamp: i64) -> i64 {
    let seconds_of_day = timestamp.rem_euclid(86_400);
    seconds_of_day / 60
}

/// IST minute-of-day (0..1440) for a Unix timestamp, via `(utcMinute + 330) mod 1440`.
pub fn ist_minute_of_day(timestamp: i64) -> u32 {
    let ist = (utc_minute_of_day(timestamp) + IST_OFFSET_MINUTES).rem_euclid(MINUTES_PER_DAY);
    ist as u32
}

/// True once the bar's IST clock has reached or passed the forced 14:30 close.
pub fn is_forced_close(timestamp: i64) -> bool {
    ist_minute_of_day(timestamp) >= FORCED_CLOSE_MINUTE
}

/// `[start, end)` half-open window check on IST minute-of-day.
pub fn in_window(timestamp: i64, start_minute: u32, end_minute: u32) -> bool {
    let m = ist_minute_of_day(timestamp);
    m >= start_minute && m < end_minute
}

/// Parses an `HH:MM` string into a minute-of-day.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (hh, mm) = value.split_once(':')?;
    let hh: u32 = hh.parse().ok()?;
    let mm: u32 = mm.parse().ok()?;
    if hh >= 24 || mm >= 60 {
        return None;
    }
    Some(hh * 60 + mm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_utc_instant_to_ist_minute() {
        let ts = 4 * 3600; // 04:00 UTC -> 09:30 IST
        assert_eq!(ist_minute_of_day(ts), MARKET_OPEN_MINUTE);
    }

    #[test]
    fn handles_day_rollover() {
        let ts = 23 * 3600 + 45 * 60; // 23:45 UTC -> 05:15 IST next day
        assert_eq!(ist_minute_of_day(ts), 5 * 60 + 15);
    }

    #[test]
    fn forced_close_fires_at_and_after_fourteen_thirty_ist() {
        let at_close = 9 * 3600; // 14:30 IST
        assert!(is_forced_close(at_close));
        assert!(!is_forced_close(at_close - 60));
    }

    #[test]
    fn parses_valid_hhmm() {
        assert_eq!(parse_hhmm("09:30"), Some(MARKET_OPEN_MINUTE));
        assert_eq!(parse_hhmm("14:30"), Some(FORCED_CLOSE_MINUTE));
    }

    #[test]
    fn rejects_malformed_hhmm() {
        assert_eq!(parse_hhmm("930"), None);
        assert_eq!(parse_hhmm("25:00"), None);
        assert_eq!(parse_hhmm("10:70"), None);
    }

    #[test]
    fn window_is_half_open() {
        let ts_at_open = 4 * 3600; // 09:30 IST
        let ts_at_close = 9 * 3600; // 14:30 IST
        assert!(in_window(ts_at_open, MARKET_OPEN_MINUTE, FORCED_CLOSE_MINUTE));
        assert!(!in_window(ts_at_close, MARKET_OPEN_MINUTE, FORCED_CLOSE_MINUTE));
    }
}
