//! Re-exports the shared IST time helpers from `htf`, plus the `HH:MM`
//! parsing used by strategy configuration (spec.md §6: time-of-day fields
//! are `HH:MM` strings, or the empty string to disable the gate).

pub use htf::{in_window, ist_date_key, ist_minute_of_day, is_forced_close, FORCED_CLOSE_MINUTE, MARKET_OPEN_MINUTE};

use crate::error::{Result, StrategyError};

/// Parses an `HH:MM` string into a minute-of-day, surfacing a `StrategyError`
/// on malformed input. Callers check for the empty-string "disabled"
/// sentinel before calling this.
pub fn parse_hhmm(value: &str) -> Result<u32> {
    htf::parse_hhmm(value).ok_or_else(|| StrategyError::InvalidParameter(format!("expected HH:MM, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hhmm() {
        assert_eq!(parse_hhmm("09:30").unwrap(), MARKET_OPEN_MINUTE);
    }

    #[test]
    fn rejects_malformed_hhmm() {
        assert!(parse_hhmm("930").is_err());
    }
}
