use thiserror::Error;

/// Date engine errors. All of them are deterministic functions of the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid layout options: {0}")]
    InvalidLayout(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
