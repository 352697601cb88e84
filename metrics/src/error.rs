use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(f64),
}

pub type Result<T> = std::result::Result<T, MetricsError>;
