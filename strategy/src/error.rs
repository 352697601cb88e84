use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    #[error("insufficient data: need at least {needed} bars, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Indicator(#[from] indicators::IndicatorError),

    #[error(transparent)]
    Htf(#[from] htf::HtfError),

    #[error(transparent)]
    Metrics(#[from] metrics::MetricsError),
}

pub type Result<T> = std::result::Result<T, StrategyError>;
