// File: chanbot-core/src/services/chat_service.rs

use std::sync::Arc;
use tracing::{debug, error, info};
use chanbot_common::models::{CallerContext, ChannelId, ChannelKey, PlatformEvent};
use crate::Error;
use crate::cache::{ChannelRegistry, ChannelSession};
use crate::services::command_service::{CommandOutcome, CommandService};
use crate::services::event_service::EventService;

/// Entry point for everything the rest of the bot pushes into the engine.
pub struct ChatService {
    registry: ChannelRegistry,
    commands: CommandService,
    events: EventService,
}

impl ChatService {
    pub fn new(registry: ChannelRegistry) -> Self {
        Self {
            commands: CommandService::new(registry.clone()),
            events: EventService::new(registry.clone()),
            registry,
        }
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// One inbound chat line. Counts toward every timer of the channel, then
    /// goes through command dispatch.
    ///
    /// Hydration errors are logged and returned; the line is dropped.
    pub async fn on_chat_message(
        &self,
        channel: &ChannelKey,
        caller: &CallerContext,
        text: &str,
    ) -> Result<CommandOutcome, Error> {
        if self.registry.config().is_bot_user(&caller.login) {
            return Ok(CommandOutcome::NotACommand);
        }

        let session = self.session_for(channel).await?;
        session.increment_activity();
        Ok(self.commands.handle_chat_line(&session, caller, text).await)
    }

    /// A platform event (follow, raid, sub...). Does not count as activity.
    pub async fn on_platform_event(
        &self,
        channel: &ChannelKey,
        event: &PlatformEvent,
    ) -> Result<Option<String>, Error> {
        let session = self.session_for(channel).await?;
        Ok(self.events.handle_event(&session, event).await)
    }

    /// Commands, events or timers of the channel were edited elsewhere.
    pub async fn on_configuration_changed(&self, id: ChannelId) -> Result<(), Error> {
        if let Some(session) = self.registry.on_configuration_changed(id).await? {
            info!("Reloaded configuration for channel {}", session.key());
        }
        Ok(())
    }

    /// The channel was disabled; drop it and all of its scheduled work.
    pub fn on_channel_disabled(&self, id: ChannelId) -> Option<ChannelKey> {
        let key = self.registry.evict_by_id(id);
        if key.is_none() {
            debug!("Disabled channel id {} was not cached", id);
        }
        key
    }

    async fn session_for(&self, channel: &ChannelKey) -> Result<Arc<ChannelSession>, Error> {
        self.registry.resolve(channel).await.map_err(|e| {
            error!("Dropping input for channel {}: {}", channel, e);
            e
        })
    }
}
