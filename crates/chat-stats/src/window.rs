//! Sliding-window chat statistics.
//!
//! Maintains a time-ordered window of recent chat events plus lifetime
//! totals, and answers windowed count and uniqueness queries.

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet, VecDeque};

/// Horizon of the retained window, in seconds.
pub const WINDOW_HORIZON_SECS: i64 = 60;

/// Width of the short sub-window, in seconds.
const SUB_WINDOW_SECS: i64 = 1;

/// Number of top chatters reported per query.
const TOP_USERS: usize = 3;

/// A single chat event retained inside the sliding window.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    /// When the message was received.
    pub occurred_at: DateTime<Utc>,
    /// Display name of the sender.
    pub username: String,
}

/// A top chatter entry, ranked by lifetime message count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopUser {
    pub username: String,
    pub message_count: u64,
}

/// Point-in-time view of the window, produced by [`WindowAggregator::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStats {
    /// Messages received within the last 60 seconds.
    pub per_minute: u64,
    /// Messages received within the last second.
    pub per_second: u64,
    /// Distinct senders within the last 60 seconds.
    pub unique_per_minute: u64,
    /// Distinct senders within the last second.
    pub unique_per_second: u64,
    /// Lifetime message count.
    pub total_messages: u64,
    /// Lifetime distinct-sender count.
    pub unique_total: u64,
    /// Top chatters by lifetime count, ties broken by first-seen order.
    pub top_users: Vec<TopUser>,
}

#[derive(Debug, Clone)]
struct UserTally {
    count: u64,
    /// Insertion sequence of the user's first message, for stable tie-breaks.
    first_seen: u64,
}

/// Sliding-window aggregator over an unbounded chat stream.
///
/// Events are appended as they are received, so insertion order coincides
/// with time order. Eviction only ever removes from the front of the
/// sequence and only entries older than the 60-second horizon. The
/// 1-second sub-window is recomputed by scanning the retained sequence on
/// each query; the retained set is bounded by the horizon, so the scan is
/// bounded too. This does not scale to very high message rates.
#[derive(Debug, Default)]
pub struct WindowAggregator {
    events: VecDeque<ChatEvent>,
    total_messages: u64,
    user_counts: HashMap<String, UserTally>,
    next_seq: u64,
}

impl WindowAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message received at `occurred_at`.
    ///
    /// O(1) amortized. Events must be recorded in receive order.
    pub fn record(&mut self, username: impl Into<String>, occurred_at: DateTime<Utc>) {
        let username = username.into();

        self.total_messages += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.user_counts
            .entry(username.clone())
            .and_modify(|tally| tally.count += 1)
            .or_insert(UserTally {
                count: 1,
                first_seen: seq,
            });

        self.events.push_back(ChatEvent {
            occurred_at,
            username,
        });
    }

    /// Evict entries past the horizon, then report window statistics.
    ///
    /// Querying twice with the same `now` and no intervening [`record`]
    /// calls yields identical results.
    ///
    /// [`record`]: WindowAggregator::record
    pub fn query(&mut self, now: DateTime<Utc>) -> WindowStats {
        self.evict(now);

        let sub_window_start = now - Duration::seconds(SUB_WINDOW_SECS);
        let per_minute = self.events.len() as u64;
        let mut per_second = 0u64;
        let mut unique_minute: HashSet<&str> = HashSet::new();
        let mut unique_second: HashSet<&str> = HashSet::new();

        for event in &self.events {
            unique_minute.insert(event.username.as_str());
            // Future-stamped events (clock skew) have a negative age and
            // count toward both sub-windows.
            if event.occurred_at >= sub_window_start {
                per_second += 1;
                unique_second.insert(event.username.as_str());
            }
        }

        WindowStats {
            per_minute,
            per_second,
            unique_per_minute: unique_minute.len() as u64,
            unique_per_second: unique_second.len() as u64,
            total_messages: self.total_messages,
            unique_total: self.user_counts.len() as u64,
            top_users: self.top_users(),
        }
    }

    /// Lifetime message count.
    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    /// Number of events currently retained in the window.
    pub fn retained_len(&self) -> usize {
        self.events.len()
    }

    fn evict(&mut self, now: DateTime<Utc>) {
        let horizon = now - Duration::seconds(WINDOW_HORIZON_SECS);
        while let Some(front) = self.events.front() {
            if front.occurred_at >= horizon {
                break;
            }
            self.events.pop_front();
        }
    }

    fn top_users(&self) -> Vec<TopUser> {
        let mut users: Vec<(&String, &UserTally)> = self.user_counts.iter().collect();
        users.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        users
            .into_iter()
            .take(TOP_USERS)
            .map(|(username, tally)| TopUser {
                username: username.clone(),
                message_count: tally.count,
            })
            .collect()
    }
}
