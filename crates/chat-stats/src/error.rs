//! Session-log error types.

use thiserror::Error;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors that can occur while writing the session log.
#[derive(Error, Debug)]
pub enum LogError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
