//! Live chat feed over the Pusher WebSocket transport.
//!
//! Kick chatrooms are Pusher channels; a run subscribes to
//! `chatrooms.{id}.v2` and filters the stream for chat message events.
//! Anything that fails to parse as a well-formed chat frame is silently
//! skipped.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use tracing::{debug, info};

use crate::error::{PlatformError, Result};

/// Pusher application endpoint used by Kick chat.
pub const PUSHER_URL: &str =
    "wss://ws-us2.pusher.com/app/32cbd69e4b950bf97679?protocol=7&client=kick-cli&version=1.0&flash=false";

const CHAT_EVENT: &str = "App\\Events\\ChatMessageEvent";

/// A chat message extracted from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Display name of the sender; `"anon"` when the frame carries none.
    pub username: String,
    /// Message content.
    pub content: String,
}

/// Source of chat messages with a bounded receive.
///
/// The bound lets callers re-check a stop signal between receives instead
/// of blocking on a quiet feed.
#[async_trait]
pub trait ChatSource: Send {
    /// Wait up to `timeout` for the next chat message. `Ok(None)` means
    /// the bound elapsed or a non-chat frame was skipped.
    async fn next_message(&mut self, timeout: Duration) -> Result<Option<ChatMessage>>;

    /// Close the underlying transport.
    async fn close(&mut self);
}

/// Outer Pusher frame. `data` is itself a JSON-encoded string.
#[derive(Debug, Deserialize)]
struct PusherEnvelope {
    event: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    #[serde(default)]
    sender: Option<ChatSender>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatSender {
    #[serde(default)]
    username: Option<String>,
}

/// Live chat feed for one chatroom.
pub struct ChatFeed {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl ChatFeed {
    /// Connect to the Pusher endpoint and subscribe to the chatroom.
    pub async fn connect(chatroom_id: u64) -> Result<Self> {
        let (mut stream, _) = connect_async(PUSHER_URL)
            .await
            .map_err(|e| PlatformError::connection(format!("WebSocket connect failed: {e}")))?;
        info!(chatroom_id, "connected to chat feed");

        let subscribe = serde_json::json!({
            "event": "pusher:subscribe",
            "data": {"auth": "", "channel": format!("chatrooms.{chatroom_id}.v2")},
        });
        stream
            .send(Message::text(subscribe.to_string()))
            .await
            .map_err(|e| PlatformError::connection(format!("subscribe failed: {e}")))?;

        Ok(Self { stream })
    }
}

#[async_trait]
impl ChatSource for ChatFeed {
    async fn next_message(&mut self, timeout: Duration) -> Result<Option<ChatMessage>> {
        match tokio::time::timeout(timeout, self.stream.next()).await {
            // Quiet feed: let the caller observe its stop signal.
            Err(_) => Ok(None),
            Ok(None) => Err(PlatformError::connection("chat stream closed")),
            Ok(Some(Err(e))) => Err(PlatformError::connection(e.to_string())),
            Ok(Some(Ok(frame))) => Ok(decode_frame(&frame)),
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "chat feed close failed");
        }
    }
}

/// Decode one WebSocket frame into a chat message, or `None` for
/// anything else (other event types, malformed JSON, binary frames).
fn decode_frame(frame: &Message) -> Option<ChatMessage> {
    let text = match frame {
        Message::Text(text) => text.as_str(),
        _ => return None,
    };

    let envelope: PusherEnvelope = serde_json::from_str(text).ok()?;
    if envelope.event != CHAT_EVENT {
        return None;
    }

    let payload: ChatPayload = serde_json::from_str(envelope.data.as_deref()?).ok()?;
    let username = payload
        .sender
        .and_then(|sender| sender.username)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "anon".to_string());

    Some(ChatMessage {
        username,
        content: payload.content.unwrap_or_default(),
    })
}
