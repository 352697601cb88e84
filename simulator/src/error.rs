use thiserror::Error;

/// The simulator's state machine never fails on malformed signal shapes
/// (spec.md §4.4/§7) — this enum exists for config validation only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulatorError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, SimulatorError>;
