//! Command-line interface definitions.

use clap::{Parser, Subcommand, ValueEnum};
use frame_capture::ImageFormat;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kick-cli", about = "Kick chat analytics CLI", version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect and print live stats
    Run(RunArgs),

    /// Export session snapshots to CSV
    ExportCsv {
        /// Session JSONL input
        #[arg(long)]
        input: PathBuf,
        /// CSV output path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Export chat messages to CSV
    ExportMessages {
        /// Session JSONL input
        #[arg(long)]
        input: PathBuf,
        /// CSV output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Kick channel name
    #[arg(long)]
    pub channel: Option<String>,

    /// Chatroom id (skips channel resolution)
    #[arg(long)]
    pub chatroom_id: Option<u64>,

    /// Proxy base url, e.g. http://localhost:3456
    #[arg(long)]
    pub proxy: Option<String>,

    /// Path to the session log JSONL
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Stop after N seconds
    #[arg(long)]
    pub duration: Option<u64>,

    /// Stop after N seconds without messages
    #[arg(long)]
    pub inactivity: Option<u64>,

    /// Capture a 480p screenshot every N seconds
    #[arg(long)]
    pub screenshot_interval: Option<u64>,

    /// Capture a screenshot on each snapshot tick
    #[arg(long)]
    pub screenshot_on_snapshot: bool,

    /// Directory to write screenshots
    #[arg(long)]
    pub screenshot_dir: Option<PathBuf>,

    /// Max screenshots to keep (older files are deleted)
    #[arg(long)]
    pub screenshot_max: Option<usize>,

    /// Screenshot file format
    #[arg(long, value_enum, default_value_t = ScreenshotFormat::Jpg)]
    pub screenshot_format: ScreenshotFormat,

    /// Embed a base64 thumbnail in snapshot records
    #[arg(long)]
    pub screenshot_embed: bool,

    /// Thumbnail width when embedding
    #[arg(long, default_value_t = 160)]
    pub screenshot_embed_width: u32,

    /// Explicit stream URL (m3u8) for screenshots
    #[arg(long)]
    pub stream_url: Option<String>,

    /// Explicit path to the ffmpeg executable
    #[arg(long)]
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenshotFormat {
    Jpg,
    Png,
}

impl From<ScreenshotFormat> for ImageFormat {
    fn from(format: ScreenshotFormat) -> Self {
        match format {
            ScreenshotFormat::Jpg => ImageFormat::Jpg,
            ScreenshotFormat::Png => ImageFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let args = Args::parse_from([
            "kick-cli",
            "run",
            "--channel",
            "SomeChannel",
            "--duration",
            "30",
            "--screenshot-on-snapshot",
            "--stream-url",
            "https://cdn.example/live.m3u8",
        ]);

        match args.command {
            Commands::Run(run) => {
                assert_eq!(run.channel.as_deref(), Some("SomeChannel"));
                assert_eq!(run.duration, Some(30));
                assert!(run.screenshot_on_snapshot);
                assert_eq!(run.screenshot_format, ScreenshotFormat::Jpg);
                assert_eq!(run.screenshot_embed_width, 160);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_export_command() {
        let args = Args::parse_from(["kick-cli", "export-csv", "--input", "session.jsonl"]);
        match args.command {
            Commands::ExportCsv { input, output } => {
                assert_eq!(input, PathBuf::from("session.jsonl"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
