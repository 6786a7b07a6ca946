use thiserror::Error;

/// Errors raised by settings loading and the shared value types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings that load but cannot drive the calendar, such as a bad
    /// timezone or a non-positive layout scale.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A value supplied by a caller that does not parse, e.g. a week start
    /// other than sunday/monday.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
