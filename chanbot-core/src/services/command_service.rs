// File: chanbot-core/src/services/command_service.rs

use std::time::Duration;
use tracing::{debug, error, info};
use chanbot_common::models::CallerContext;
use crate::cache::{ChannelRegistry, ChannelSession};
use crate::templates::{BuiltinTags, TagContext};

/// What happened to a chat line that went through command dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Line does not start with the command prefix.
    NotACommand,
    Unknown(String),
    InsufficientLevel(String),
    OnCooldown(String),
    /// The session was evicted while the reply was being rendered.
    SessionClosed(String),
    /// The rendered reply that was handed to the transport.
    Executed(String),
}

/// Extracts the alias from `!alias args...`. `None` if the line is not a
/// command invocation.
pub fn parse_invocation<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.trim_start()
        .strip_prefix(prefix)?
        .split(char::is_whitespace)
        .next()
        .filter(|alias| !alias.is_empty())
}

/// Gates and executes custom commands.
pub struct CommandService {
    registry: ChannelRegistry,
}

impl CommandService {
    pub fn new(registry: ChannelRegistry) -> Self {
        debug!("Initializing CommandService");
        Self { registry }
    }

    /// Runs the command named by `text` if it exists, the caller's level is
    /// high enough and it is off cooldown, in that order. A rejected
    /// invocation never starts a cooldown.
    pub async fn handle_chat_line(
        &self,
        session: &ChannelSession,
        caller: &CallerContext,
        text: &str,
    ) -> CommandOutcome {
        let prefix = self.registry.config().command_prefix.as_str();
        let Some(alias) = parse_invocation(text, prefix) else {
            return CommandOutcome::NotACommand;
        };
        debug!("Parsed command '{}' in channel {}", alias, session.key());

        let Some(entry) = session.get_command(alias) else {
            debug!("No command found matching '{}'", alias);
            return CommandOutcome::Unknown(alias.to_string());
        };
        let command = &entry.command;

        let level = caller.user_level();
        if level < command.min_user_level {
            debug!(
                "{} ({}) lacks level {} for '{}'",
                caller.display_name, level, command.min_user_level, alias
            );
            return CommandOutcome::InsufficientLevel(alias.to_string());
        }

        if command.cooldown_seconds > 0 {
            let cooldown = Duration::from_secs(u64::from(command.cooldown_seconds));
            if !entry.cooldown.try_activate(cooldown, session.cancel_token()) {
                debug!("Command '{}' is on cooldown in channel {}", alias, session.key());
                return CommandOutcome::OnCooldown(alias.to_string());
            }
        }

        let commands = session.public_command_list(prefix);
        let builtins = BuiltinTags {
            sender: Some(&caller.display_name),
            channel: session.key(),
            commands: &commands,
        };
        let ctx = TagContext { channel: session.key(), channel_id: session.id(), caller };
        let reply = self.registry.resolver().render(&command.message, &builtins, &ctx).await;

        if !session.is_live() {
            debug!("Channel {} was evicted before '{}' replied", session.key(), alias);
            return CommandOutcome::SessionClosed(alias.to_string());
        }

        info!("Executing command '{}' for {} in {}", alias, caller.display_name, session.key());
        if let Err(e) = self.registry.transport().send(session.key(), &reply).await {
            error!("Failed to send reply for '{}' in {}: {:?}", alias, session.key(), e);
        }
        CommandOutcome::Executed(reply)
    }
}
