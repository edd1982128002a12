use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::error::Error;
use crate::models::{ChannelId, ChannelIdentity, ChannelKey, StreamInfo};

/// Translates a chat-visible channel login into its stable id.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_channel_id(&self, key: &ChannelKey) -> Result<ChannelIdentity, Error>;
}

/// Outbound chat. Fire-and-forget: `Ok` only means the line was handed off.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, channel: &ChannelKey, text: &str) -> Result<(), Error>;
}

/// Live platform data behind the dynamic template tags.
#[async_trait]
pub trait ChannelDataApi: Send + Sync {
    /// When `viewer_id` started following the channel, or `None` if they don't.
    async fn fetch_follow_date(
        &self,
        viewer_id: &str,
        channel_id: ChannelId,
    ) -> Result<Option<DateTime<Utc>>, Error>;

    async fn fetch_follower_count(&self, channel_id: ChannelId) -> Result<u64, Error>;

    async fn fetch_subscriber_count(&self, channel_id: ChannelId) -> Result<u64, Error>;

    /// Current stream, or `None` while offline.
    async fn fetch_stream(&self, channel: &ChannelKey) -> Result<Option<StreamInfo>, Error>;
}
