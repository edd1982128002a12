// File: chanbot-server/src/transport.rs

use async_trait::async_trait;
use tracing::info;
use chanbot_common::models::ChannelKey;
use chanbot_common::traits::ChatTransport;
use chanbot_core::Error;

/// Writes outgoing chat lines to stdout in IRC `PRIVMSG` form.
pub struct StdoutTransport;

#[async_trait]
impl ChatTransport for StdoutTransport {
    async fn send(&self, channel: &ChannelKey, text: &str) -> Result<(), Error> {
        info!("-> {}: {}", channel, text);
        println!("PRIVMSG {} :{}", channel.to_irc_channel(), text);
        Ok(())
    }
}
