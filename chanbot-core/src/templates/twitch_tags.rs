// File: chanbot-core/src/templates/twitch_tags.rs
//
// The dynamic tags backed by live Twitch data.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use chanbot_common::traits::ChannelDataApi;
use crate::Error;
use crate::templates::resolver::{DynamicTag, TagContext};
use crate::utils::time::{format_follow_age, format_uptime};

/// `{{followage}}`: how long the caller has followed the channel.
pub struct FollowAgeTag {
    api: Arc<dyn ChannelDataApi>,
}

impl FollowAgeTag {
    pub fn new(api: Arc<dyn ChannelDataApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DynamicTag for FollowAgeTag {
    fn tag(&self) -> &'static str {
        "{{followage}}"
    }

    fn fallback(&self) -> &'static str {
        "error fetching followage data"
    }

    async fn resolve(&self, ctx: &TagContext<'_>) -> Result<String, Error> {
        let followed_at = self
            .api
            .fetch_follow_date(&ctx.caller.user_id, ctx.channel_id)
            .await?;
        Ok(match followed_at {
            Some(since) => format_follow_age(Utc::now().signed_duration_since(since)),
            None => format!("{} does not follow {}", ctx.caller.display_name, ctx.channel),
        })
    }
}

/// `{{followcount}}`
pub struct FollowCountTag {
    api: Arc<dyn ChannelDataApi>,
}

impl FollowCountTag {
    pub fn new(api: Arc<dyn ChannelDataApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DynamicTag for FollowCountTag {
    fn tag(&self) -> &'static str {
        "{{followcount}}"
    }

    fn fallback(&self) -> &'static str {
        "error fetching followcount data"
    }

    async fn resolve(&self, ctx: &TagContext<'_>) -> Result<String, Error> {
        Ok(self.api.fetch_follower_count(ctx.channel_id).await?.to_string())
    }
}

/// `{{subcount}}`
pub struct SubCountTag {
    api: Arc<dyn ChannelDataApi>,
}

impl SubCountTag {
    pub fn new(api: Arc<dyn ChannelDataApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DynamicTag for SubCountTag {
    fn tag(&self) -> &'static str {
        "{{subcount}}"
    }

    fn fallback(&self) -> &'static str {
        "error fetching subcount data"
    }

    async fn resolve(&self, ctx: &TagContext<'_>) -> Result<String, Error> {
        Ok(self.api.fetch_subscriber_count(ctx.channel_id).await?.to_string())
    }
}

/// `{{uptime}}`: time since the current stream started.
pub struct UptimeTag {
    api: Arc<dyn ChannelDataApi>,
}

impl UptimeTag {
    pub fn new(api: Arc<dyn ChannelDataApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DynamicTag for UptimeTag {
    fn tag(&self) -> &'static str {
        "{{uptime}}"
    }

    fn fallback(&self) -> &'static str {
        "error fetching uptime data"
    }

    async fn resolve(&self, ctx: &TagContext<'_>) -> Result<String, Error> {
        Ok(match self.api.fetch_stream(ctx.channel).await? {
            Some(stream) => format_uptime(Utc::now().signed_duration_since(stream.started_at)),
            None => format!("{} is not live", ctx.channel),
        })
    }
}

/// `{{game}}`: the current stream category.
pub struct GameTag {
    api: Arc<dyn ChannelDataApi>,
}

impl GameTag {
    pub fn new(api: Arc<dyn ChannelDataApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DynamicTag for GameTag {
    fn tag(&self) -> &'static str {
        "{{game}}"
    }

    fn fallback(&self) -> &'static str {
        "error fetching game data"
    }

    async fn resolve(&self, ctx: &TagContext<'_>) -> Result<String, Error> {
        Ok(match self.api.fetch_stream(ctx.channel).await? {
            Some(stream) => stream.game_name,
            None => format!("{} is not live", ctx.channel),
        })
    }
}
