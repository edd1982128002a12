// File: chanbot-core/src/platforms/twitch/requests/follow.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from `GET /helix/channels/followers`.
#[derive(Debug, Deserialize)]
pub struct ChannelFollowersResponse {
    pub data: Vec<FollowerData>,
    /// The total number of users that follow this broadcaster.
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct FollowerData {
    pub followed_at: DateTime<Utc>,
    pub user_id: String,
    pub user_login: String,
}

impl TwitchHelixClient {
    /// When `viewer_id` started following `broadcaster_id`, or `Ok(None)` if
    /// they do not follow.
    ///
    /// Requires `moderator:read:followers` for the broadcaster.
    pub async fn fetch_followed_at(
        &self,
        viewer_id: &str,
        broadcaster_id: &str,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        if viewer_id.is_empty() || broadcaster_id.is_empty() {
            warn!("fetch_followed_at called with empty viewer_id or broadcaster_id");
            return Ok(None);
        }

        let parsed: ChannelFollowersResponse = self
            .get_json(
                "channels/followers",
                &[("broadcaster_id", broadcaster_id), ("user_id", viewer_id)],
            )
            .await?;

        // Only one record when a single user_id is requested.
        Ok(parsed.data.first().map(|f| f.followed_at))
    }

    /// Total follower count of the broadcaster.
    pub async fn fetch_follower_total(&self, broadcaster_id: &str) -> Result<u64, Error> {
        let parsed: ChannelFollowersResponse = self
            .get_json(
                "channels/followers",
                &[("broadcaster_id", broadcaster_id), ("first", "1")],
            )
            .await?;
        Ok(parsed.total)
    }
}
