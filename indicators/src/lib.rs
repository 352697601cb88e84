//! Streaming technical indicators used by the signal-generation pipeline.
//!
//! Every indicator here is implemented once, as an incremental state struct
//! with `update`/`value`/`reset`. The batch form (`sma`, `ema`, ...) is a thin
//! fold over the same incremental struct, so batch and incremental outputs can
//! never drift apart — they are the same code path.

mod adx;
mod atr;
mod ema;
mod error;
mod rsi;
mod smoothed_ema;
mod sma;

pub use adx::{adx, Adx};
pub use atr::{atr, Atr};
pub use ema::{ema, Ema};
pub use error::{IndicatorError, Result};
pub use rsi::{rsi, Rsi};
pub use smoothed_ema::{smoothed_ema, SmoothedEma};
pub use sma::{sma, Sma};
