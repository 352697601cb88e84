//! Higher-timeframe bar aggregation and look-ahead-safe completed-bar queries.
//!
//! Minute bars go in one at a time through [`HtfAggregator::push`]; a strategy
//! never sees the in-progress bar for the current period, only whatever the
//! aggregator has already marked complete, surfaced through
//! [`LastCompletedHtfView`].

mod aggregator;
mod bar;
mod error;
mod series;
mod time;
mod view;

pub use aggregator::{HtfAggregator, HtfInterval};
pub use bar::{validate_series, Bar, HtfBar};
pub use error::{HtfError, Result};
pub use series::htf_ema_series;
pub use time::{
    in_window, ist_date, ist_date_key, ist_minute_of_day, ist_offset, is_forced_close, parse_hhmm,
    to_ist, FORCED_CLOSE_MINUTE, MARKET_OPEN_MINUTE,
};
pub use view::LastCompletedHtfView;
