//! Frame-capture: single-frame captures of a live stream via ffmpeg.
//!
//! ## Core Types
//!
//! - [`CaptureCoordinator`] - Runs one bounded ffmpeg invocation per
//!   capture, keeps a bounded ring of output files, and optionally
//!   re-encodes a base64 thumbnail for embedding
//! - [`CaptureOutcome`] - Path and timestamp of a successful capture
//! - [`resolve_tool`] - ffmpeg discovery (explicit path, `PATH`, known
//!   Windows install locations)

pub mod coordinator;
pub mod error;
pub mod ffmpeg;

pub use coordinator::{CaptureConfig, CaptureCoordinator, CaptureOutcome, ImageFormat};
pub use error::{CaptureError, Result};
pub use ffmpeg::{resolve_tool, timestamp_label};
