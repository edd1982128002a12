// File: chanbot-core/src/cache/channel_session.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use chanbot_common::models::{ChannelId, ChannelKey, Command, EventConfig, TimerConfig};
use chanbot_common::traits::ChatTransport;
use crate::tasks::{CommandCooldown, TimerRuntime};
use crate::templates::{BuiltinTags, TemplateResolver};

/// A command plus its shared per-channel cooldown.
#[derive(Debug)]
pub struct SessionCommand {
    pub command: Command,
    pub cooldown: CommandCooldown,
}

/// In-memory state of one active channel.
///
/// Owns every piece of scheduled work for the channel (timer tickers and
/// cooldown clears) through a single cancellation token, so `shutdown`
/// stops all of it at once.
#[derive(Debug)]
pub struct ChannelSession {
    key: ChannelKey,
    id: ChannelId,
    commands: Vec<SessionCommand>,
    events: HashMap<String, EventConfig>,
    timers: Vec<TimerRuntime>,
    ttl: Duration,
    deadline: Mutex<Instant>,
    cancel: CancellationToken,
}

impl ChannelSession {
    /// Builds a session from freshly fetched configuration. Disabled timers
    /// get no runtime. Nothing is scheduled until `start_timers`.
    pub fn new(
        key: ChannelKey,
        id: ChannelId,
        commands: Vec<Command>,
        events: Vec<EventConfig>,
        timers: Vec<TimerConfig>,
        ttl: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let commands = commands
            .into_iter()
            .map(|command| SessionCommand { command, cooldown: CommandCooldown::new() })
            .collect();
        let events = events.into_iter().map(|e| (e.name.clone(), e)).collect();
        let timers = timers
            .into_iter()
            .filter(|t| t.enabled)
            .map(|t| TimerRuntime::new(t, &cancel))
            .collect();

        Self {
            key,
            id,
            commands,
            events,
            timers,
            ttl,
            deadline: Mutex::new(Instant::now() + ttl),
            cancel,
        }
    }

    pub fn key(&self) -> &ChannelKey {
        &self.key
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn commands(&self) -> &[SessionCommand] {
        &self.commands
    }

    pub fn timers(&self) -> &[TimerRuntime] {
        &self.timers
    }

    /// Exact, case-sensitive alias lookup.
    pub fn get_command(&self, alias: &str) -> Option<&SessionCommand> {
        self.commands.iter().find(|c| c.command.alias == alias)
    }

    pub fn event(&self, name: &str) -> Option<&EventConfig> {
        self.events.get(name)
    }

    /// One inbound chat message: bumps every timer's counter.
    pub fn increment_activity(&self) {
        for timer in &self.timers {
            timer.record_message();
        }
    }

    /// Commands anyone can run, as `<prefix><alias>` joined by `", "`.
    pub fn public_command_list(&self, prefix: &str) -> String {
        self.commands
            .iter()
            .filter(|c| c.command.is_public())
            .map(|c| format!("{prefix}{}", c.command.alias))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Pushes the eviction deadline out by one TTL from now.
    pub fn touch(&self) {
        *self.deadline.lock() = Instant::now() + self.ttl;
    }

    pub fn deadline(&self) -> Instant {
        *self.deadline.lock()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline()
    }

    /// Token that is cancelled when the session is shut down.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// False once the session has been evicted.
    pub fn is_live(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Starts every timer ticker. Timer text only carries built-in tags,
    /// which are fixed for the life of the session, so it is rendered once here.
    pub fn start_timers(
        &self,
        transport: Arc<dyn ChatTransport>,
        resolver: &TemplateResolver,
        prefix: &str,
    ) {
        if !self.is_live() {
            return;
        }
        let commands = self.public_command_list(prefix);
        let builtins = BuiltinTags { sender: None, channel: &self.key, commands: &commands };
        for timer in &self.timers {
            let text = resolver.render_builtin(&timer.config().message, &builtins);
            timer.start(self.key.clone(), text, transport.clone());
        }
        debug!("Started {} timer(s) for channel {}", self.timers.len(), self.key);
    }

    /// Cancels all timers and pending cooldown clears. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        for timer in &self.timers {
            timer.stop();
        }
    }
}

impl Drop for ChannelSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
