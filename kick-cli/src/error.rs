//! Application error type.

use chat_stats::LogError;
use frame_capture::CaptureError;
use kick_platform::PlatformError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration combination, reported before anything starts.
    #[error("{0}")]
    InvalidOptions(String),

    #[error("Failed to resolve channel: {0}")]
    Resolve(#[source] PlatformError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Session log error: {0}")]
    Log(#[from] LogError),

    #[error("{0}")]
    Export(String),
}

impl AppError {
    /// Create an invalid-options error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }
}
