//! Chat feed listener.
//!
//! Aggregation happens before the log write, so windowed counts stay
//! correct even if the sink stalls.

use chat_stats::{SessionLogWriter, SessionRecord};
use chrono::Utc;
use kick_platform::ChatSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;

use super::signal::{StopReason, StopSignal};
use super::state::SessionState;

/// Per-receive bound so the listener observes the stop signal promptly.
const RECEIVE_BOUND: Duration = Duration::from_secs(1);

/// Consume the feed until it fails or the session stops.
pub(crate) async fn run_listener<C: ChatSource>(
    mut feed: C,
    state: Arc<Mutex<SessionState>>,
    log: Arc<Mutex<SessionLogWriter>>,
    channel: String,
    signal: Arc<StopSignal>,
) {
    while !signal.is_cancelled() {
        match feed.next_message(RECEIVE_BOUND).await {
            Ok(None) => continue,
            Ok(Some(message)) => {
                let now = Utc::now();
                {
                    let mut state = state.lock().await;
                    state.record_message(&message.username, now);
                }

                let record = SessionRecord::Message {
                    ts: now,
                    channel: channel.clone(),
                    username: message.username,
                    message: message.content,
                };
                if let Err(e) = log.lock().await.write_record(&record).await {
                    warn!(error = %e, "failed to append message record");
                }
            }
            Err(e) => {
                if !signal.is_cancelled() {
                    warn!(error = %e, "chat feed failed");
                    signal.trigger(StopReason::FeedClosed);
                }
                break;
            }
        }
    }

    feed.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kick_platform::{ChatMessage, PlatformError};
    use std::collections::VecDeque;

    /// Scripted feed: yields queued results, then fails.
    struct ScriptedFeed {
        items: VecDeque<kick_platform::Result<Option<ChatMessage>>>,
    }

    #[async_trait]
    impl ChatSource for ScriptedFeed {
        async fn next_message(
            &mut self,
            _timeout: Duration,
        ) -> kick_platform::Result<Option<ChatMessage>> {
            self.items
                .pop_front()
                .unwrap_or_else(|| Err(PlatformError::connection("script exhausted")))
        }

        async fn close(&mut self) {}
    }

    #[tokio::test]
    async fn test_listener_records_and_logs_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let log = Arc::new(Mutex::new(SessionLogWriter::create(&path).await.unwrap()));
        let state = Arc::new(Mutex::new(SessionState::new(None)));
        let signal = Arc::new(StopSignal::new());

        let feed = ScriptedFeed {
            items: VecDeque::from([
                Ok(Some(ChatMessage {
                    username: "A".to_string(),
                    content: "hello".to_string(),
                })),
                Ok(None),
                Ok(Some(ChatMessage {
                    username: "B".to_string(),
                    content: "hi".to_string(),
                })),
            ]),
        };

        run_listener(
            feed,
            state.clone(),
            log.clone(),
            "somechannel".to_string(),
            signal.clone(),
        )
        .await;

        // Script exhaustion surfaces as a feed failure.
        assert_eq!(signal.reason(), Some(StopReason::FeedClosed));
        assert_eq!(state.lock().await.window.total_messages(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let messages: Vec<SessionRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], SessionRecord::Message { username, .. } if username == "A"));
    }

    #[tokio::test]
    async fn test_listener_exits_on_cancel_without_feed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let log = Arc::new(Mutex::new(SessionLogWriter::create(&path).await.unwrap()));
        let state = Arc::new(Mutex::new(SessionState::new(None)));
        let signal = Arc::new(StopSignal::new());
        signal.trigger(StopReason::DurationElapsed);

        let feed = ScriptedFeed {
            items: VecDeque::new(),
        };

        run_listener(
            feed,
            state,
            log,
            "somechannel".to_string(),
            signal.clone(),
        )
        .await;

        // The pre-existing stop reason is preserved.
        assert_eq!(signal.reason(), Some(StopReason::DurationElapsed));
    }
}
