//! Single-frame capture coordination.
//!
//! Each capture is one short-lived ffmpeg invocation bounded by a
//! timeout; a timed-out process is killed, never leaked. Successful
//! captures feed a bounded retention ring; overflow deletes the oldest
//! file best-effort.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::error::{CaptureError, Result};
use crate::ffmpeg;

/// Timeout for the primary frame capture.
const PRIMARY_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for the thumbnail re-encode.
const THUMBNAIL_TIMEOUT: Duration = Duration::from_secs(10);
/// Scale filter for the primary frame: 480p, width rounded to even.
const PRIMARY_SCALE: &str = "scale=-2:480";

/// Output image format for captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpg,
    Png,
}

impl ImageFormat {
    /// File extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

/// Configuration for a capture coordinator.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Resolved path of the ffmpeg executable.
    pub ffmpeg_path: PathBuf,
    /// Source stream locator (HLS URL).
    pub stream_url: String,
    /// Directory receiving capture files.
    pub output_dir: PathBuf,
    /// File name prefix (channel name or `chatroom-<id>`).
    pub file_label: String,
    /// Output image format.
    pub format: ImageFormat,
    /// Maximum number of retained capture files, if bounded.
    pub max_retained: Option<usize>,
    /// Thumbnail width when base64 embedding is enabled.
    pub thumbnail_width: Option<u32>,
}

/// Result of a successful capture.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    /// Path of the written frame.
    pub path: PathBuf,
    /// When the capture was taken.
    pub created_at: DateTime<Utc>,
    /// Base64-encoded thumbnail, when embedding is enabled and the
    /// re-encode succeeded.
    pub thumbnail_base64: Option<String>,
}

/// Coordinates single-frame captures against one stream.
pub struct CaptureCoordinator {
    config: CaptureConfig,
    retained: VecDeque<PathBuf>,
}

impl CaptureCoordinator {
    /// Create a coordinator, ensuring the output directory exists.
    pub fn new(config: CaptureConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            config,
            retained: VecDeque::new(),
        })
    }

    /// Capture a single frame.
    ///
    /// Returns `Ok(None)` for recoverable per-invocation failures
    /// (timeout, non-zero exit); `Err(ToolMissing)` when the tool cannot
    /// be spawned at all, which callers must treat as fatal.
    pub async fn capture_once(&mut self, now: DateTime<Utc>) -> Result<Option<CaptureOutcome>> {
        let file_name = format!(
            "{}-{}.{}",
            self.config.file_label,
            ffmpeg::timestamp_label(now),
            self.config.format.extension()
        );
        let output_path = self.config.output_dir.join(file_name);

        let mut cmd = ffmpeg::command(&self.config.ffmpeg_path);
        cmd.args(self.primary_args(&output_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CaptureError::ToolMissing(self.config.ffmpeg_path.clone()));
            }
            Err(e) => {
                warn!(error = %e, "failed to spawn capture process");
                return Ok(None);
            }
        };

        let waited = tokio::time::timeout(PRIMARY_TIMEOUT, child.wait()).await;
        let status = match waited {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                warn!(error = %e, "capture process wait failed");
                return Ok(None);
            }
            Err(_) => {
                warn!("capture timed out, killing ffmpeg");
                let _ = child.kill().await;
                return Ok(None);
            }
        };

        if !status.success() {
            warn!(%status, "capture exited with failure");
            return Ok(None);
        }

        self.retain(output_path.clone()).await;

        let thumbnail_base64 = match self.config.thumbnail_width {
            Some(width) => self.encode_thumbnail(&output_path, width).await,
            None => None,
        };

        Ok(Some(CaptureOutcome {
            path: output_path,
            created_at: now,
            thumbnail_base64,
        }))
    }

    fn primary_args(&self, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            self.config.stream_url.clone(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            PRIMARY_SCALE.to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    fn thumbnail_args(&self, frame: &Path, width: u32) -> Vec<String> {
        vec![
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            frame.to_string_lossy().into_owned(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!("scale={width}:-2"),
            "-f".to_string(),
            "image2pipe".to_string(),
            "-vcodec".to_string(),
            "mjpeg".to_string(),
            "-".to_string(),
        ]
    }

    /// Track a successful capture; evict and delete the oldest file once
    /// the ring exceeds its bound. Deletion failures are swallowed.
    async fn retain(&mut self, path: PathBuf) {
        let Some(max) = self.config.max_retained else {
            return;
        };

        self.retained.push_back(path);
        while self.retained.len() > max {
            if let Some(oldest) = self.retained.pop_front() {
                if let Err(e) = tokio::fs::remove_file(&oldest).await {
                    debug!(path = %oldest.display(), error = %e, "retention delete failed");
                }
            }
        }
    }

    /// Re-encode the fresh frame to a small mjpeg on stdout and base64 it.
    /// Any failure here leaves the primary capture intact.
    async fn encode_thumbnail(&self, frame: &Path, width: u32) -> Option<String> {
        let mut cmd = ffmpeg::command(&self.config.ffmpeg_path);
        cmd.args(self.thumbnail_args(frame, width))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!(error = %e, "failed to spawn thumbnail encode");
                return None;
            }
        };
        let mut stdout = child.stdout.take()?;

        let collect = async {
            let mut bytes = Vec::new();
            stdout.read_to_end(&mut bytes).await?;
            let status = child.wait().await?;
            std::io::Result::Ok((status, bytes))
        };

        let collected = tokio::time::timeout(THUMBNAIL_TIMEOUT, collect).await;
        match collected {
            Ok(Ok((status, bytes))) if status.success() && !bytes.is_empty() => {
                Some(STANDARD.encode(bytes))
            }
            Ok(_) => {
                debug!("thumbnail encode failed");
                None
            }
            Err(_) => {
                warn!("thumbnail encode timed out, killing ffmpeg");
                let _ = child.kill().await;
                None
            }
        }
    }
}
