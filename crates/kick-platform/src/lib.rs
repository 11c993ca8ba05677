//! Kick-platform: Kick.com API access and real-time chat feed.
//!
//! ## Core Types
//!
//! - [`KickApiClient`] - Channel resolution, viewer-count refresh, and
//!   stream URL discovery over the public channels API
//! - [`ChatFeed`] - Live chat messages for a chatroom over the Pusher
//!   WebSocket transport
//! - [`ChatSource`] - Trait seam for the feed, so session logic can be
//!   driven by a scripted source in tests

pub mod api;
pub mod chat;
pub mod error;
pub mod models;

pub use api::KickApiClient;
pub use chat::{ChatFeed, ChatMessage, ChatSource, PUSHER_URL};
pub use error::{PlatformError, Result};
pub use models::ChannelInfo;
