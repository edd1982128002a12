// File: chanbot-core/src/platforms/twitch/requests/stream.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use chanbot_common::models::StreamInfo;
use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Streams".
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    pub data: Vec<StreamData>,
}

/// Single stream data record.
#[derive(Debug, Deserialize)]
pub struct StreamData {
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(rename = "type")]
    pub type_field: String, // "live" or "" on error
    #[serde(default)]
    pub title: String,
    pub viewer_count: u32,
    pub started_at: DateTime<Utc>,
}

impl From<StreamData> for StreamInfo {
    fn from(s: StreamData) -> Self {
        StreamInfo {
            started_at: s.started_at,
            game_name: s.game_name,
            title: s.title,
            viewer_count: s.viewer_count,
        }
    }
}

impl TwitchHelixClient {
    /// The user's current stream, or `None` if offline.
    pub async fn fetch_live_stream(&self, user_login: &str) -> Result<Option<StreamInfo>, Error> {
        let parsed: StreamsResponse = self
            .get_json("streams", &[("user_login", user_login)])
            .await?;

        let stream = parsed.data.into_iter().find(|s| s.type_field == "live");
        if stream.is_none() {
            debug!("{} is offline", user_login);
        }
        Ok(stream.map(StreamInfo::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_live_stream_to_info() {
        let raw = r#"{
            "data": [{
                "id": "40952121085",
                "user_id": "101051819",
                "user_login": "afro",
                "user_name": "Afro",
                "game_id": "32982",
                "game_name": "Grand Theft Auto V",
                "type": "live",
                "title": "Jacob: Digital Den Laptops & Routers",
                "tags": [],
                "viewer_count": 1490,
                "started_at": "2021-03-10T03:18:11Z",
                "language": "en",
                "thumbnail_url": "https://example.invalid/thumb.jpg",
                "is_mature": false
            }],
            "pagination": {}
        }"#;
        let parsed: StreamsResponse = serde_json::from_str(raw).unwrap();
        let info: StreamInfo = parsed.data.into_iter().next().unwrap().into();
        assert_eq!(info.game_name, "Grand Theft Auto V");
        assert_eq!(info.viewer_count, 1490);
        assert_eq!(info.started_at.to_rfc3339(), "2021-03-10T03:18:11+00:00");
    }

    #[test]
    fn offline_is_empty_data() {
        let parsed: StreamsResponse = serde_json::from_str(r#"{"data": [], "pagination": {}}"#).unwrap();
        assert!(parsed.data.is_empty());
    }
}
