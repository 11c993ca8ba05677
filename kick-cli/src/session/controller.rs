//! Session controller.
//!
//! Owns startup validation side effects (resolution, tool discovery, log
//! creation), starts the concurrent activities, and drives the clean
//! shutdown path shared by every stop condition.

use chat_stats::{SessionLogWriter, SessionRecord};
use chrono::Utc;
use frame_capture::{CaptureConfig, CaptureCoordinator, timestamp_label};
use kick_platform::{ChatFeed, KickApiClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::listener::run_listener;
use super::options::{
    ScreenshotTrigger, SessionOptions, default_log_path, default_screenshot_dir,
};
use super::scheduler::{SnapshotScheduler, capture_and_apply};
use super::signal::{StopReason, StopSignal};
use super::state::SessionState;
use crate::error::{AppError, Result};

/// Cadence of the best-effort viewer-count refresh.
const VIEWER_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Run a live session to completion and report why it stopped.
pub async fn run_session(options: SessionOptions) -> Result<StopReason> {
    let api = KickApiClient::new(options.proxy.clone());

    // Resolve the chatroom first; without it nothing else can start.
    let (chatroom_id, initial_viewers, resolved_stream_url) = match options.chatroom_id {
        Some(id) => (id, None, None),
        None => {
            let Some(name) = options.channel.as_deref() else {
                return Err(AppError::invalid("Provide --channel or --chatroom-id"));
            };
            let info = api
                .resolve_channel(name)
                .await
                .map_err(AppError::Resolve)?;
            (info.chatroom_id, info.viewer_count, info.playback_url)
        }
    };

    let log_path = match &options.log_path {
        Some(path) => path.clone(),
        None => default_log_path(
            &options.file_label(chatroom_id),
            &timestamp_label(Utc::now()),
        ),
    };

    // Capture subsystem setup fails fast, before any activity starts.
    let capture = match &options.screenshots {
        Some(shot) => {
            let stream_url = match &shot.stream_url {
                Some(url) => Some(url.clone()),
                None => match (&resolved_stream_url, options.channel.as_deref()) {
                    (Some(url), _) => Some(url.clone()),
                    (None, Some(name)) => api.resolve_stream_url(name).await,
                    (None, None) => None,
                },
            };
            let Some(stream_url) = stream_url else {
                return Err(AppError::invalid(
                    "Screenshot enabled but stream URL is missing. Use --stream-url.",
                ));
            };

            let ffmpeg_path = frame_capture::resolve_tool(shot.ffmpeg_path.as_deref())
                .ok_or_else(|| {
                    AppError::invalid(
                        "ffmpeg not found. Install it or pass --ffmpeg-path to the executable.",
                    )
                })?;

            let output_dir = shot
                .dir
                .clone()
                .unwrap_or_else(|| default_screenshot_dir(&log_path));
            let coordinator = CaptureCoordinator::new(CaptureConfig {
                ffmpeg_path,
                stream_url,
                output_dir,
                file_label: options.file_label(chatroom_id),
                format: shot.format,
                max_retained: shot.max_retained,
                thumbnail_width: shot.embed.then_some(shot.embed_width),
            })?;
            Some((shot.trigger, Arc::new(Mutex::new(coordinator))))
        }
        None => None,
    };

    let mut writer = SessionLogWriter::create(&log_path).await?;
    println!("Logging to {}", log_path.display());
    writer
        .write_record(&SessionRecord::SessionStart {
            ts: Utc::now(),
            channel: options.record_channel(),
            chatroom_id,
        })
        .await?;

    let feed = ChatFeed::connect(chatroom_id).await?;
    info!(chatroom_id, "session started");

    let state = Arc::new(Mutex::new(SessionState::new(initial_viewers)));
    let log = Arc::new(Mutex::new(writer));
    let signal = Arc::new(StopSignal::new());
    let record_channel = options.record_channel();

    let mut tasks = JoinSet::new();

    tasks.spawn(run_listener(
        feed,
        state.clone(),
        log.clone(),
        record_channel.clone(),
        signal.clone(),
    ));

    let scheduler_capture = match &capture {
        Some((ScreenshotTrigger::OnSnapshot, coordinator)) => Some(coordinator.clone()),
        _ => None,
    };
    tasks.spawn(
        SnapshotScheduler {
            state: state.clone(),
            log: log.clone(),
            signal: signal.clone(),
            channel: record_channel,
            duration: options.duration,
            inactivity: options.inactivity,
            capture: scheduler_capture,
            embed: options
                .screenshots
                .as_ref()
                .is_some_and(|shot| shot.embed),
            started: Instant::now(),
        }
        .run(),
    );

    if let Some(channel) = options.channel.clone() {
        tasks.spawn(run_viewer_poller(
            api.clone(),
            channel,
            state.clone(),
            signal.clone(),
        ));
    }

    if let Some((ScreenshotTrigger::Interval(every), coordinator)) = &capture {
        tasks.spawn(run_capture_loop(
            coordinator.clone(),
            *every,
            state.clone(),
            signal.clone(),
        ));
    }

    if let Some(limit) = options.duration {
        tasks.spawn(run_duration_timer(limit, signal.clone()));
    }

    tokio::select! {
        _ = signal.cancelled() => {}
        interrupt = tokio::signal::ctrl_c() => {
            if let Err(e) = interrupt {
                debug!(error = %e, "ctrl-c handler failed");
            }
            println!("\nStopping...");
            signal.trigger(StopReason::Interrupted);
        }
    }

    // Every activity observes the signal within its iteration bound.
    while tasks.join_next().await.is_some() {}

    let reason = signal.reason().unwrap_or(StopReason::Interrupted);
    println!("\nSession stopped: {reason}.");
    Ok(reason)
}

/// Refresh the viewer count every 20 seconds; failures reset the value
/// to unknown rather than leaving a stale success behind.
async fn run_viewer_poller(
    api: KickApiClient,
    channel: String,
    state: Arc<Mutex<SessionState>>,
    signal: Arc<StopSignal>,
) {
    loop {
        let count = tokio::select! {
            _ = signal.cancelled() => break,
            count = api.fetch_viewer_count(&channel) => count,
        };
        state.lock().await.viewer_count = count;

        tokio::select! {
            _ = signal.cancelled() => break,
            _ = sleep(VIEWER_POLL_INTERVAL) => {}
        }
    }
}

/// Fixed-interval capture loop; independent of the snapshot cadence.
async fn run_capture_loop(
    coordinator: Arc<Mutex<CaptureCoordinator>>,
    every: Duration,
    state: Arc<Mutex<SessionState>>,
    signal: Arc<StopSignal>,
) {
    while !signal.is_cancelled() {
        capture_and_apply(coordinator.clone(), state.clone(), signal.clone()).await;

        tokio::select! {
            _ = signal.cancelled() => break,
            _ = sleep(every) => {}
        }
    }
}

async fn run_duration_timer(limit: Duration, signal: Arc<StopSignal>) {
    tokio::select! {
        _ = signal.cancelled() => {}
        _ = sleep(limit) => signal.trigger(StopReason::DurationElapsed),
    }
}
