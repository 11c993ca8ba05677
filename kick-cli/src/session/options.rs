//! Validated session options.
//!
//! All configuration combinations are rejected here, before any
//! concurrent activity starts; use-sites never re-check them.

use frame_capture::ImageFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::RunArgs;
use crate::error::{AppError, Result};

/// How captures are triggered. The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenshotTrigger {
    /// Independent fixed-interval capture loop.
    Interval(Duration),
    /// Capture on each snapshot tick, skipped while one is in flight.
    OnSnapshot,
}

/// Validated screenshot configuration.
#[derive(Debug, Clone)]
pub struct ScreenshotOptions {
    pub trigger: ScreenshotTrigger,
    pub dir: Option<PathBuf>,
    pub max_retained: Option<usize>,
    pub format: ImageFormat,
    pub embed: bool,
    pub embed_width: u32,
    pub stream_url: Option<String>,
    pub ffmpeg_path: Option<PathBuf>,
}

/// Validated options for a live run.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Channel name, lowercased. At least one of `channel` and
    /// `chatroom_id` is present.
    pub channel: Option<String>,
    pub chatroom_id: Option<u64>,
    pub proxy: Option<String>,
    pub log_path: Option<PathBuf>,
    pub duration: Option<Duration>,
    pub inactivity: Option<Duration>,
    pub screenshots: Option<ScreenshotOptions>,
}

impl SessionOptions {
    /// Validate raw CLI arguments into usable options.
    pub fn from_args(args: RunArgs) -> Result<Self> {
        if args.channel.is_none() && args.chatroom_id.is_none() {
            return Err(AppError::invalid("Provide --channel or --chatroom-id"));
        }
        if args.screenshot_on_snapshot && args.screenshot_interval.is_some() {
            return Err(AppError::invalid(
                "Use either --screenshot-interval or --screenshot-on-snapshot, not both.",
            ));
        }
        if args.duration == Some(0) {
            return Err(AppError::invalid(
                "Duration must be a positive number of seconds.",
            ));
        }
        if args.inactivity == Some(0) {
            return Err(AppError::invalid(
                "Inactivity must be a positive number of seconds.",
            ));
        }
        if args.screenshot_interval == Some(0) {
            return Err(AppError::invalid(
                "Screenshot interval must be a positive number of seconds.",
            ));
        }
        if args.screenshot_max == Some(0) {
            return Err(AppError::invalid(
                "Screenshot max must be a positive number.",
            ));
        }
        if args.screenshot_embed_width == 0 {
            return Err(AppError::invalid(
                "Screenshot embed width must be a positive number.",
            ));
        }

        let screenshots = if args.screenshot_on_snapshot || args.screenshot_interval.is_some() {
            let trigger = match args.screenshot_interval {
                Some(secs) => ScreenshotTrigger::Interval(Duration::from_secs(secs)),
                None => ScreenshotTrigger::OnSnapshot,
            };
            Some(ScreenshotOptions {
                trigger,
                dir: args.screenshot_dir,
                max_retained: args.screenshot_max,
                format: args.screenshot_format.into(),
                embed: args.screenshot_embed,
                embed_width: args.screenshot_embed_width,
                stream_url: args.stream_url,
                ffmpeg_path: args.ffmpeg_path,
            })
        } else {
            None
        };

        Ok(Self {
            channel: args.channel.map(|name| name.to_lowercase()),
            chatroom_id: args.chatroom_id,
            proxy: args.proxy,
            log_path: args.log,
            duration: args.duration.map(Duration::from_secs),
            inactivity: args.inactivity.map(Duration::from_secs),
            screenshots,
        })
    }

    /// Label used in file names: the channel name, or `chatroom-<id>`.
    pub fn file_label(&self, chatroom_id: u64) -> String {
        self.channel
            .clone()
            .unwrap_or_else(|| format!("chatroom-{chatroom_id}"))
    }

    /// Channel field written into log records; `manual` for id-only runs.
    pub fn record_channel(&self) -> String {
        self.channel.clone().unwrap_or_else(|| "manual".to_string())
    }
}

/// Default session log path when `--log` is not given.
pub fn default_log_path(label: &str, stamp: &str) -> PathBuf {
    PathBuf::from(format!("kick-session-{label}-{stamp}.jsonl"))
}

/// Default screenshot directory, derived from the log path.
pub fn default_screenshot_dir(log_path: &Path) -> PathBuf {
    let stem = log_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string());
    log_path.with_file_name(format!("{stem}-screenshots"))
}
