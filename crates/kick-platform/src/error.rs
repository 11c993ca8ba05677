//! Platform error types.

use thiserror::Error;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Errors that can occur while talking to the platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP transport or decoding errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection-related errors (WebSocket handshake, stream closed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Protocol parsing/encoding errors
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The channel exists but exposes no chatroom.
    #[error("Chatroom id not found for channel {0}")]
    ChatroomNotFound(String),
}

impl PlatformError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
