//! Cross-activity shared session state.

use chat_stats::WindowAggregator;
use chrono::{DateTime, Utc};
use frame_capture::CaptureOutcome;
use std::path::PathBuf;
use tokio::time::Instant;

/// Reference to the most recent successful capture.
#[derive(Debug, Clone)]
pub struct CaptureRef {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

/// Everything mutated by more than one activity lives here, behind a
/// single mutex domain: window counts and uniqueness updates must appear
/// atomic to readers, so per-field locks are deliberately avoided.
#[derive(Debug)]
pub struct SessionState {
    pub window: WindowAggregator,
    /// Last-known external viewer count; `None` means unknown.
    pub viewer_count: Option<u64>,
    pub latest_capture: Option<CaptureRef>,
    /// Base64 thumbnail of the latest capture, when embedding succeeded.
    pub latest_thumbnail: Option<String>,
    /// Receive time of the most recent message, for the inactivity stop.
    pub last_message_at: Instant,
}

impl SessionState {
    pub fn new(viewer_count: Option<u64>) -> Self {
        Self {
            window: WindowAggregator::new(),
            viewer_count,
            latest_capture: None,
            latest_thumbnail: None,
            last_message_at: Instant::now(),
        }
    }

    /// Record one received chat message.
    pub fn record_message(&mut self, username: &str, now: DateTime<Utc>) {
        self.window.record(username, now);
        self.last_message_at = Instant::now();
    }

    /// Publish a completed capture as the latest reference.
    pub fn apply_capture(&mut self, outcome: CaptureOutcome) {
        self.latest_thumbnail = outcome.thumbnail_base64;
        self.latest_capture = Some(CaptureRef {
            path: outcome.path,
            created_at: outcome.created_at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_capture_replaces_thumbnail() {
        let mut state = SessionState::new(Some(10));

        state.apply_capture(CaptureOutcome {
            path: PathBuf::from("a.jpg"),
            created_at: Utc::now(),
            thumbnail_base64: Some("dGh1bWI=".to_string()),
        });
        assert!(state.latest_thumbnail.is_some());

        // A capture whose thumbnail failed clears the stale thumbnail.
        state.apply_capture(CaptureOutcome {
            path: PathBuf::from("b.jpg"),
            created_at: Utc::now(),
            thumbnail_base64: None,
        });
        assert_eq!(state.latest_capture.unwrap().path, PathBuf::from("b.jpg"));
        assert!(state.latest_thumbnail.is_none());
    }
}
