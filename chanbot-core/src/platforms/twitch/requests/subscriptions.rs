// File: chanbot-core/src/platforms/twitch/requests/subscriptions.rs

use serde::Deserialize;
use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Broadcaster Subscriptions". Only the totals are read.
#[derive(Debug, Deserialize)]
pub struct SubscriptionsResponse {
    pub total: u64,
    #[serde(default)]
    pub points: u64,
}

impl TwitchHelixClient {
    /// Number of active subscriptions. Requires `channel:read:subscriptions`.
    pub async fn fetch_subscriber_total(&self, broadcaster_id: &str) -> Result<u64, Error> {
        let parsed: SubscriptionsResponse = self
            .get_json(
                "subscriptions",
                &[("broadcaster_id", broadcaster_id), ("first", "1")],
            )
            .await?;
        Ok(parsed.total)
    }
}
