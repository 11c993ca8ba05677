//! Wire models for the Kick channels API.
//!
//! The public API is loose about field spellings (`viewer_count` vs
//! `viewerCount`, `playback_url` vs `playbackUrl`), so every optional
//! field carries the aliases observed in the wild.

use serde::Deserialize;

/// Resolved view of a channel, assembled from [`ChannelResponse`].
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    /// Chatroom id used for the Pusher subscription.
    pub chatroom_id: u64,
    /// Current viewer count, when the channel is live.
    pub viewer_count: Option<u64>,
    /// HLS playback URL, when the channel is live.
    pub playback_url: Option<String>,
}

/// Raw response of `GET /api/v2/channels/{name}`.
#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    #[serde(default)]
    pub chatroom: Option<Chatroom>,
    #[serde(default)]
    pub livestream: Option<Livestream>,
    #[serde(default, alias = "playbackUrl")]
    pub playback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chatroom {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct Livestream {
    #[serde(default, alias = "viewerCount")]
    pub viewer_count: Option<u64>,
    #[serde(default, alias = "playbackUrl")]
    pub playback_url: Option<String>,
    #[serde(default)]
    pub hls: Option<String>,
}

impl ChannelResponse {
    /// First known playback URL candidate, probing livestream fields
    /// before the top-level fallbacks.
    pub fn stream_url(&self) -> Option<String> {
        let live = self.livestream.as_ref();
        live.and_then(|l| l.playback_url.clone())
            .or_else(|| live.and_then(|l| l.hls.clone()))
            .or_else(|| self.playback_url.clone())
    }
}

/// Raw response of the proxy lookup `GET {base}/channel?name={name}`.
#[derive(Debug, Deserialize)]
pub struct ProxyChannelResponse {
    #[serde(default, rename = "chatroomId")]
    pub chatroom_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_channel_response() {
        let json = r#"{
            "chatroom": {"id": 12345},
            "livestream": {"viewer_count": 678, "playback_url": "https://cdn.example/live.m3u8"}
        }"#;

        let response: ChannelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.chatroom.as_ref().unwrap().id, 12345);
        assert_eq!(
            response.livestream.as_ref().unwrap().viewer_count,
            Some(678)
        );
        assert_eq!(
            response.stream_url().as_deref(),
            Some("https://cdn.example/live.m3u8")
        );
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let json = r#"{
            "chatroom": {"id": 1},
            "livestream": {"viewerCount": 9, "playbackUrl": "https://cdn.example/a.m3u8"}
        }"#;

        let response: ChannelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.livestream.as_ref().unwrap().viewer_count, Some(9));
        assert_eq!(
            response.stream_url().as_deref(),
            Some("https://cdn.example/a.m3u8")
        );
    }

    #[test]
    fn test_stream_url_fallback_order() {
        let json = r#"{
            "livestream": {"hls": "https://cdn.example/hls.m3u8"},
            "playback_url": "https://cdn.example/top.m3u8"
        }"#;

        let response: ChannelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.stream_url().as_deref(),
            Some("https://cdn.example/hls.m3u8")
        );
    }

    #[test]
    fn test_offline_channel() {
        let json = r#"{"chatroom": {"id": 3}, "livestream": null}"#;

        let response: ChannelResponse = serde_json::from_str(json).unwrap();
        assert!(response.livestream.is_none());
        assert!(response.stream_url().is_none());
    }

    #[test]
    fn test_parse_proxy_response() {
        let json = r#"{"chatroomId": 555}"#;
        let response: ProxyChannelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.chatroom_id, Some(555));
    }
}
