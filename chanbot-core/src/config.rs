// File: chanbot-core/src/config.rs

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::Error;

/// Runtime knobs of the channel engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inactivity window after which a cached channel is evicted.
    pub channel_ttl_seconds: u64,

    /// How often the eviction task scans for expired channels.
    pub eviction_sweep_seconds: u64,

    pub command_prefix: String,

    /// Chat lines from this login are ignored (the bot's own messages).
    pub bot_username: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel_ttl_seconds: 300,
            eviction_sweep_seconds: 15,
            command_prefix: "!".to_string(),
            bot_username: None,
        }
    }
}

impl EngineConfig {
    /// Loads a JSON config file; missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: EngineConfig = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.channel_ttl_seconds == 0 {
            return Err(Error::Config("channel_ttl_seconds must be greater than 0".into()));
        }
        if self.eviction_sweep_seconds == 0 {
            return Err(Error::Config("eviction_sweep_seconds must be greater than 0".into()));
        }
        if self.command_prefix.trim().is_empty() {
            return Err(Error::Config("command_prefix must not be empty".into()));
        }
        Ok(())
    }

    pub fn channel_ttl(&self) -> Duration {
        Duration::from_secs(self.channel_ttl_seconds)
    }

    pub fn eviction_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_sweep_seconds)
    }

    /// True if `login` is the bot's own account.
    pub fn is_bot_user(&self, login: &str) -> bool {
        self.bot_username
            .as_deref()
            .is_some_and(|bot| bot.eq_ignore_ascii_case(login))
    }
}
