use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum IndicatorError {
    #[error("period must be at least {min}, got {got}")]
    InvalidPeriod { min: usize, got: usize },

    #[error("smoothing period must be at least {min}, got {got}")]
    InvalidSmoothingPeriod { min: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
