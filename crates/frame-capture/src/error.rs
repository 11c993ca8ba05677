//! Capture error types.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors that can occur while coordinating captures.
///
/// Only [`CaptureError::ToolMissing`] is fatal for a running session;
/// timeouts and non-zero exits are absorbed per invocation.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The capture tool vanished (or was never spawnable).
    #[error("ffmpeg not found at {}", .0.display())]
    ToolMissing(PathBuf),

    /// IO errors setting up the capture subsystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
