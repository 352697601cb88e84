use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum HtfError {
    #[error("bar timestamps must be strictly non-decreasing, got {prev} then {next}")]
    NonMonotonicTimestamp { prev: i64, next: i64 },

    #[error("bar has non-finite or negative field: {0}")]
    DegenerateBar(String),
}

pub type Result<T> = std::result::Result<T, HtfError>;
