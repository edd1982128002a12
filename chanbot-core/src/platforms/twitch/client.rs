// File: chanbot-core/src/platforms/twitch/client.rs

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use tracing::{trace, warn};
use chanbot_common::models::{ChannelId, ChannelIdentity, ChannelKey, StreamInfo};
use chanbot_common::traits::{ChannelDataApi, IdentityResolver};
use crate::Error;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// A small wrapper client for the Helix endpoints the engine needs.
///
/// The individual calls live under `requests::*`; this struct only carries the
/// credentials and the shared HTTP client.
#[derive(Clone)]
pub struct TwitchHelixClient {
    http: Arc<ReqwestClient>,
    bearer_token: String,
    client_id: String,
    base_url: String,
}

impl TwitchHelixClient {
    /// - `bearer_token`: a user token with `moderator:read:followers` and
    ///   `channel:read:subscriptions` for the channels it serves
    /// - `client_id`: the application's client id
    pub fn new(bearer_token: &str, client_id: &str) -> Self {
        Self::with_base_url(bearer_token, client_id, HELIX_BASE_URL)
    }

    pub fn with_base_url(bearer_token: &str, client_id: &str, base_url: &str) -> Self {
        Self {
            http: Arc::new(ReqwestClient::new()),
            bearer_token: bearer_token.to_string(),
            client_id: client_id.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `GET {base}/{path}?{query}` with Helix auth headers; non-2xx becomes
    /// `Error::Platform`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = format!("{}/{}", self.base_url, path);
        trace!("GET {} {:?}", url, query);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .header("Client-Id", &self.client_id)
            .header("Authorization", format!("Bearer {}", self.bearer_token))
            .send()
            .await
            .map_err(|e| Error::Platform(format!("Network error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            warn!("GET /{} => status={} body={}", path, status, body_text);
            return Err(Error::Platform(format!(
                "Twitch API error: HTTP {} => {}",
                status, body_text
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| Error::Platform(format!("Error parsing /{path} JSON: {e}")))
    }
}

#[async_trait]
impl IdentityResolver for TwitchHelixClient {
    async fn resolve_channel_id(&self, key: &ChannelKey) -> Result<ChannelIdentity, Error> {
        let user = self
            .fetch_user_by_login(key.as_str())
            .await?
            .ok_or_else(|| Error::NotFound(format!("Twitch user '{key}'")))?;
        Ok(ChannelIdentity {
            id: user.id.parse()?,
            login: user.login,
        })
    }
}

#[async_trait]
impl ChannelDataApi for TwitchHelixClient {
    async fn fetch_follow_date(
        &self,
        viewer_id: &str,
        channel_id: ChannelId,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        self.fetch_followed_at(viewer_id, &channel_id.to_string()).await
    }

    async fn fetch_follower_count(&self, channel_id: ChannelId) -> Result<u64, Error> {
        self.fetch_follower_total(&channel_id.to_string()).await
    }

    async fn fetch_subscriber_count(&self, channel_id: ChannelId) -> Result<u64, Error> {
        self.fetch_subscriber_total(&channel_id.to_string()).await
    }

    async fn fetch_stream(&self, channel: &ChannelKey) -> Result<Option<StreamInfo>, Error> {
        self.fetch_live_stream(channel.as_str()).await
    }
}
