// File: chanbot-common/src/models/channel.rs

use std::fmt;
use serde::{Deserialize, Serialize};

/// The chat-visible login of a channel (e.g. `mtheb_`).
///
/// Keys are case-insensitive: construction lowercases the login and strips a
/// leading `#`, so `#MtheB_` and `mtheb_` address the same channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ChannelKey(String);

impl ChannelKey {
    pub fn new(login: &str) -> Self {
        Self(login.trim().trim_start_matches('#').to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The IRC-style `#login` form.
    pub fn to_irc_channel(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelKey {
    fn from(s: &str) -> Self {
        ChannelKey::new(s)
    }
}

impl From<String> for ChannelKey {
    fn from(s: String) -> Self {
        ChannelKey::new(&s)
    }
}

impl From<ChannelKey> for String {
    fn from(key: ChannelKey) -> Self {
        key.0
    }
}

/// The platform's stable numeric channel id. Survives renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub i64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChannelId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ChannelId)
            .map_err(|e| crate::Error::Parse(format!("invalid channel id '{s}': {e}")))
    }
}

/// Result of resolving a channel key through the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub id: ChannelId,
    /// The login the platform currently reports for `id`.
    pub login: String,
}

impl ChannelIdentity {
    /// True if the platform's current login no longer matches `key`.
    pub fn is_renamed_from(&self, key: &ChannelKey) -> bool {
        ChannelKey::new(&self.login) != *key
    }
}
