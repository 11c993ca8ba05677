//! Shared stop signal for session activities.
//!
//! One terminal signal for the whole session: the first trigger wins and
//! records why the session is ending; every long-lived activity observes
//! the cancellation within its own per-iteration bound.

use std::fmt;
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;

/// Why the session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured run duration elapsed.
    DurationElapsed,
    /// No messages arrived within the inactivity threshold.
    Inactive,
    /// External interruption (Ctrl-C).
    Interrupted,
    /// The chat feed transport closed or failed.
    FeedClosed,
    /// The capture tool disappeared after startup.
    CaptureUnavailable,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::DurationElapsed => "duration elapsed",
            StopReason::Inactive => "inactivity threshold reached",
            StopReason::Interrupted => "interrupted",
            StopReason::FeedClosed => "chat feed closed",
            StopReason::CaptureUnavailable => "capture tool unavailable",
        };
        f.write_str(text)
    }
}

/// Terminal stop signal shared by all session activities.
#[derive(Debug, Default)]
pub struct StopSignal {
    token: CancellationToken,
    reason: OnceLock<StopReason>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the session. The first recorded reason wins; later triggers
    /// only re-cancel the (already cancelled) token.
    pub fn trigger(&self, reason: StopReason) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    /// Resolves once the session is stopping.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The recorded stop reason, if any trigger has fired.
    pub fn reason(&self) -> Option<StopReason> {
        self.reason.get().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_trigger_wins() {
        let signal = StopSignal::new();
        assert!(signal.reason().is_none());
        assert!(!signal.is_cancelled());

        signal.trigger(StopReason::DurationElapsed);
        signal.trigger(StopReason::Interrupted);

        assert!(signal.is_cancelled());
        assert_eq!(signal.reason(), Some(StopReason::DurationElapsed));

        // Already-cancelled future resolves immediately.
        signal.cancelled().await;
    }
}
