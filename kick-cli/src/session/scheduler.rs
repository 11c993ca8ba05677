//! Snapshot scheduler.
//!
//! Fires on a fixed 1-second cadence: query the aggregator, rewrite the
//! status line, persist a snapshot record, optionally trigger a capture,
//! then evaluate the stop conditions.

use chat_stats::{SessionLogWriter, SessionRecord, SnapshotFields, WindowStats};
use chrono::Utc;
use frame_capture::{CaptureCoordinator, CaptureError};
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{error, warn};

use super::signal::{StopReason, StopSignal};
use super::state::SessionState;
use crate::output;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Gate enforcing at most one in-flight capture task.
#[derive(Default)]
pub(crate) struct InFlightGate {
    task: Option<JoinHandle<()>>,
}

impl InFlightGate {
    /// Spawn `fut` unless the previous task is still running.
    pub(crate) fn try_begin<F>(&mut self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(task) = &self.task
            && !task.is_finished()
        {
            return false;
        }
        self.task = Some(tokio::spawn(fut));
        true
    }

    /// Wait for the in-flight task, if any. Captures are bounded by
    /// their own process timeout, so this cannot hang indefinitely.
    pub(crate) async fn finish(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// State for the fixed-cadence snapshot loop.
pub(crate) struct SnapshotScheduler {
    pub state: Arc<Mutex<SessionState>>,
    pub log: Arc<Mutex<SessionLogWriter>>,
    pub signal: Arc<StopSignal>,
    /// Channel field written into snapshot records.
    pub channel: String,
    pub duration: Option<Duration>,
    pub inactivity: Option<Duration>,
    /// Capture coordinator, set only in on-snapshot trigger mode.
    pub capture: Option<Arc<Mutex<CaptureCoordinator>>>,
    /// Whether snapshot records embed the latest thumbnail.
    pub embed: bool,
    pub started: Instant,
}

struct TickView {
    stats: WindowStats,
    viewer_count: Option<u64>,
    screenshot_path: Option<String>,
    thumbnail: Option<String>,
    last_message_at: Instant,
}

impl SnapshotScheduler {
    pub(crate) async fn run(self) {
        let mut ticker = interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut gate = InFlightGate::default();

        loop {
            tokio::select! {
                _ = self.signal.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let now = Utc::now();
            let tick = {
                let mut state = self.state.lock().await;
                TickView {
                    stats: state.window.query(now),
                    viewer_count: state.viewer_count,
                    screenshot_path: state
                        .latest_capture
                        .as_ref()
                        .map(|capture| capture.path.display().to_string()),
                    thumbnail: state.latest_thumbnail.clone(),
                    last_message_at: state.last_message_at,
                }
            };

            let line = output::render_status_line(&tick.stats, tick.viewer_count);
            print!("\r{line}    ");
            let _ = std::io::stdout().flush();

            let record = SessionRecord::Snapshot(SnapshotFields {
                ts: now,
                channel: self.channel.clone(),
                messages_per_minute: tick.stats.per_minute,
                messages_per_second: tick.stats.per_second,
                unique_per_minute: tick.stats.unique_per_minute,
                unique_per_second: tick.stats.unique_per_second,
                total_messages: tick.stats.total_messages,
                unique_total: tick.stats.unique_total,
                viewer_count: tick.viewer_count,
                screenshot_path: tick.screenshot_path,
                screenshot_base64: if self.embed { tick.thumbnail } else { None },
            });
            if let Err(e) = self.log.lock().await.write_record(&record).await {
                warn!(error = %e, "failed to append snapshot record");
            }

            if let Some(coordinator) = &self.capture {
                gate.try_begin(capture_and_apply(
                    coordinator.clone(),
                    self.state.clone(),
                    self.signal.clone(),
                ));
            }

            if let Some(threshold) = self.inactivity
                && tick.last_message_at.elapsed() >= threshold
            {
                println!("\nStopping after {}s inactivity.", threshold.as_secs());
                self.signal.trigger(StopReason::Inactive);
                break;
            }
            if let Some(limit) = self.duration
                && self.started.elapsed() >= limit
            {
                self.signal.trigger(StopReason::DurationElapsed);
                break;
            }
        }

        // An in-flight capture finishes or hits its own timeout; it is
        // never leaked.
        gate.finish().await;
    }
}

/// Run one capture and publish its outcome into the shared state.
pub(crate) async fn capture_and_apply(
    coordinator: Arc<Mutex<CaptureCoordinator>>,
    state: Arc<Mutex<SessionState>>,
    signal: Arc<StopSignal>,
) {
    let result = coordinator.lock().await.capture_once(Utc::now()).await;
    match result {
        Ok(Some(outcome)) => state.lock().await.apply_capture(outcome),
        Ok(None) => {}
        Err(CaptureError::ToolMissing(path)) => {
            error!(path = %path.display(), "ffmpeg disappeared, stopping session");
            signal.trigger(StopReason::CaptureUnavailable);
        }
        Err(e) => warn!(error = %e, "capture failed"),
    }
}
