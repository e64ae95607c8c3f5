//! Error types for the directive lifecycle core.

use thiserror::Error;

/// Errors raised while accepting, dispatching or completing directives.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The directive's result handle has already been completed.
    #[error("result already reported for message id: {message_id}")]
    ResultAlreadyReported { message_id: String },

    /// The directive text could not be turned into a `Directive`.
    #[error("invalid directive: {0}")]
    InvalidDirective(String),

    /// A log level name that does not map to any known level.
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AgentError>;
