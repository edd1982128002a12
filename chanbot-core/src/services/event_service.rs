// File: chanbot-core/src/services/event_service.rs

use tracing::{debug, error};
use chanbot_common::models::PlatformEvent;
use crate::cache::{ChannelRegistry, ChannelSession};
use crate::templates::resolver::CHANNEL_TAG;
use crate::templates::substitute;

/// Announces platform events (follows, raids, subs...) using the channel's
/// configured event messages.
pub struct EventService {
    registry: ChannelRegistry,
}

impl EventService {
    pub fn new(registry: ChannelRegistry) -> Self {
        Self { registry }
    }

    /// Returns the announced text, or `None` if the event is not configured,
    /// disabled, or an auto-host.
    pub async fn handle_event(
        &self,
        session: &ChannelSession,
        event: &PlatformEvent,
    ) -> Option<String> {
        if !event.is_announceable() {
            debug!("Ignoring auto-host in channel {}", session.key());
            return None;
        }

        let config = session.event(event.name())?;
        if !config.enabled {
            debug!("Event '{}' is disabled in channel {}", config.name, session.key());
            return None;
        }

        let mut pairs = event.substitutions();
        pairs.push((CHANNEL_TAG, session.key().to_string()));
        let text = substitute(&config.message, &pairs);

        if !session.is_live() {
            return None;
        }
        if let Err(e) = self.registry.transport().send(session.key(), &text).await {
            error!("Failed to announce '{}' in {}: {:?}", config.name, session.key(), e);
        }
        Some(text)
    }
}
