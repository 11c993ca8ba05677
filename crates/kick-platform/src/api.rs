//! HTTP client for the Kick channels API.
//!
//! Channel resolution is a fatal-at-startup concern; viewer-count refresh
//! and stream URL discovery are best-effort and degrade to `None`.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::debug;

use crate::error::{PlatformError, Result};
use crate::models::{ChannelInfo, ChannelResponse, ProxyChannelResponse};

const API_BASE: &str = "https://kick.com/api/v2/channels";
const DEFAULT_UA: &str = "kick-cli";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for channel lookups against the public API, or against a
/// caller-provided proxy base.
#[derive(Debug, Clone)]
pub struct KickApiClient {
    client: Client,
    proxy_base: Option<String>,
}

impl KickApiClient {
    /// Create a client. `proxy_base` switches channel resolution to the
    /// proxy's `/channel?name=` endpoint.
    pub fn new(proxy_base: Option<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_UA));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            client,
            proxy_base: proxy_base.map(|base| base.trim_end_matches('/').to_string()),
        }
    }

    /// Resolve a channel name to its chatroom id plus whatever live
    /// metadata the API exposes.
    pub async fn resolve_channel(&self, name: &str) -> Result<ChannelInfo> {
        if let Some(base) = &self.proxy_base {
            let url = format!("{base}/channel?name={name}");
            let response: ProxyChannelResponse =
                self.client.get(&url).send().await?.json().await?;
            let chatroom_id = response
                .chatroom_id
                .ok_or_else(|| PlatformError::ChatroomNotFound(name.to_string()))?;
            return Ok(ChannelInfo {
                chatroom_id,
                viewer_count: None,
                playback_url: None,
            });
        }

        let response = self.fetch_channel(name).await?;
        let chatroom_id = response
            .chatroom
            .as_ref()
            .map(|chatroom| chatroom.id)
            .ok_or_else(|| PlatformError::ChatroomNotFound(name.to_string()))?;

        Ok(ChannelInfo {
            chatroom_id,
            viewer_count: response
                .livestream
                .as_ref()
                .and_then(|live| live.viewer_count),
            playback_url: response.stream_url(),
        })
    }

    /// Current viewer count, or `None` when the lookup fails or the
    /// channel is offline. Never fatal.
    pub async fn fetch_viewer_count(&self, name: &str) -> Option<u64> {
        match self.fetch_channel(name).await {
            Ok(response) => response
                .livestream
                .as_ref()
                .and_then(|live| live.viewer_count),
            Err(e) => {
                debug!(channel = name, error = %e, "viewer count refresh failed");
                None
            }
        }
    }

    /// Playback URL for screenshot captures, or `None` when unavailable.
    pub async fn resolve_stream_url(&self, name: &str) -> Option<String> {
        match self.fetch_channel(name).await {
            Ok(response) => response.stream_url(),
            Err(e) => {
                debug!(channel = name, error = %e, "stream url lookup failed");
                None
            }
        }
    }

    async fn fetch_channel(&self, name: &str) -> Result<ChannelResponse> {
        let url = format!("{API_BASE}/{name}");
        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_base_trailing_slash_trimmed() {
        let client = KickApiClient::new(Some("http://localhost:3456/".to_string()));
        assert_eq!(client.proxy_base.as_deref(), Some("http://localhost:3456"));
    }
}
