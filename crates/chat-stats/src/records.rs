//! Durable session-log record types.
//!
//! Each line of the session log is one of these records, discriminated by
//! a `type` field. Consumers must order records by their own `ts` field,
//! not by file position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single line in the session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionRecord {
    /// Written once at the start of a run.
    SessionStart {
        ts: DateTime<Utc>,
        channel: String,
        chatroom_id: u64,
    },
    /// One received chat message.
    Message {
        ts: DateTime<Utc>,
        channel: String,
        username: String,
        message: String,
    },
    /// Periodic aggregate snapshot. Raw numeric fields only; the live
    /// status line is cosmetic and not part of this record.
    Snapshot(SnapshotFields),
}

/// Fields of a snapshot record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFields {
    pub ts: DateTime<Utc>,
    pub channel: String,
    pub messages_per_minute: u64,
    pub messages_per_second: u64,
    pub unique_per_minute: u64,
    pub unique_per_second: u64,
    pub total_messages: u64,
    pub unique_total: u64,
    pub viewer_count: Option<u64>,
    pub screenshot_path: Option<String>,
    pub screenshot_base64: Option<String>,
}

impl SessionRecord {
    /// Timestamp carried by any record variant.
    pub fn ts(&self) -> DateTime<Utc> {
        match self {
            SessionRecord::SessionStart { ts, .. } => *ts,
            SessionRecord::Message { ts, .. } => *ts,
            SessionRecord::Snapshot(fields) => fields.ts,
        }
    }
}
