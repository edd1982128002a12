// File: chanbot-server/src/simulate.rs
//
// Line-oriented chat simulator. Each stdin line is one inbound trigger:
//
//   chat <channel> <user_id> <display_name> <badges|-> <message...>
//   event <channel> <json>
//   reload <channel_id>
//   disable <channel_id>
//   channels

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};
use chanbot_common::models::{CallerContext, ChannelId, ChannelKey, PlatformEvent};
use chanbot_core::{ChatService, Error};

#[derive(Debug, PartialEq)]
pub enum SimCommand {
    Chat { channel: ChannelKey, caller: CallerContext, text: String },
    Event { channel: ChannelKey, event: PlatformEvent },
    Reload(ChannelId),
    Disable(ChannelId),
    Channels,
}

fn missing(what: &str) -> Error {
    Error::Parse(format!("missing {what}"))
}

pub fn parse_line(line: &str) -> Result<Option<SimCommand>, Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();

    let cmd = match verb {
        "chat" => {
            let mut parts = rest.splitn(5, char::is_whitespace);
            let channel = ChannelKey::new(parts.next().ok_or_else(|| missing("channel"))?);
            let user_id = parts.next().ok_or_else(|| missing("user id"))?;
            let name = parts.next().ok_or_else(|| missing("display name"))?;
            let badges = parts.next().ok_or_else(|| missing("badges"))?;
            let text = parts.next().unwrap_or_default().to_string();
            let badges = if badges == "-" { "" } else { badges };
            SimCommand::Chat { channel, caller: CallerContext::new(user_id, name, badges), text }
        }
        "event" => {
            let (channel, json) = rest.split_once(char::is_whitespace).ok_or_else(|| missing("event json"))?;
            SimCommand::Event {
                channel: ChannelKey::new(channel),
                event: serde_json::from_str(json.trim())?,
            }
        }
        "reload" => SimCommand::Reload(rest.parse()?),
        "disable" => SimCommand::Disable(rest.parse()?),
        "channels" => SimCommand::Channels,
        other => return Err(Error::Parse(format!("unknown input '{other}'"))),
    };
    Ok(Some(cmd))
}

/// Feeds every line of `input` into the engine until EOF.
pub async fn run<R: AsyncBufRead + Unpin>(chat: &ChatService, input: R) -> anyhow::Result<()> {
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                warn!("Ignoring input line: {}", e);
                continue;
            }
        };

        let result = match cmd {
            SimCommand::Chat { channel, caller, text } => chat
                .on_chat_message(&channel, &caller, &text)
                .await
                .map(|outcome| debug!("{} -> {:?}", channel, outcome)),
            SimCommand::Event { channel, event } => chat
                .on_platform_event(&channel, &event)
                .await
                .map(|sent| debug!("{} event {} -> {:?}", channel, event.name(), sent)),
            SimCommand::Reload(id) => chat.on_configuration_changed(id).await,
            SimCommand::Disable(id) => {
                match chat.on_channel_disabled(id) {
                    Some(key) => info!("Disabled channel {}", key),
                    None => info!("Channel id {} was not active", id),
                }
                Ok(())
            }
            SimCommand::Channels => {
                info!("Active channels: {:?}", chat.registry().keys());
                Ok(())
            }
        };

        if let Err(e) = result {
            error!("{}", e);
        }
    }
    Ok(())
}
