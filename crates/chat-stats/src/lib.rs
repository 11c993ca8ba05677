//! Chat-stats: sliding-window statistics and session logging for live chat.
//!
//! This crate provides the aggregation core for a live chat session: a
//! time-ordered sliding window over incoming messages, lifetime counters,
//! and the newline-delimited JSON session log that makes a run replayable.
//!
//! ## Core Types
//!
//! - [`WindowAggregator`] - Sliding-window counts and uniqueness queries
//! - [`WindowStats`] - A point-in-time view produced by a query
//! - [`SessionRecord`] - A single durable log record (`session_start`,
//!   `message`, or `snapshot`)
//! - [`SessionLogWriter`] - Append-only JSONL writer, flushed per record

pub mod error;
pub mod log;
pub mod records;
pub mod window;

pub use error::{LogError, Result};
pub use log::SessionLogWriter;
pub use records::{SessionRecord, SnapshotFields};
pub use window::{ChatEvent, TopUser, WindowAggregator, WindowStats, WINDOW_HORIZON_SECS};
