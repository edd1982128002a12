use async_trait::async_trait;
use crate::error::Error;
use crate::models::{ChannelId, Command, EventConfig, TimerConfig};

/// Read side of the per-channel configuration store.
///
/// Only called while hydrating a channel session.
#[async_trait]
pub trait ChannelConfigRepository: Send + Sync {
    async fn fetch_commands(&self, channel_id: ChannelId) -> Result<Vec<Command>, Error>;
    async fn fetch_events(&self, channel_id: ChannelId) -> Result<Vec<EventConfig>, Error>;
    async fn fetch_timers(&self, channel_id: ChannelId) -> Result<Vec<TimerConfig>, Error>;
}
