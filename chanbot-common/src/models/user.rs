// File: chanbot-common/src/models/user.rs

use std::fmt;
use serde::{Deserialize, Serialize};

/// Rank of a chatter, derived from their role badges. Ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "i32", into = "i32")]
pub enum UserLevel {
    #[default]
    User = 0,
    Vip = 1,
    Subscriber = 2,
    /// Moderators, global mods and the broadcaster share the top rank.
    Moderator = 3,
}

impl UserLevel {
    /// Level granted by a single badge name, if the badge is recognized.
    pub fn from_badge(badge: &str) -> Option<Self> {
        match badge {
            "user" => Some(UserLevel::User),
            "vip" => Some(UserLevel::Vip),
            "subscriber" => Some(UserLevel::Subscriber),
            "moderator" | "global_mod" | "broadcaster" => Some(UserLevel::Moderator),
            _ => None,
        }
    }

    /// Highest level among the recognized badges; `User` if none match.
    pub fn from_badges<'a, I>(badges: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        badges
            .into_iter()
            .filter_map(UserLevel::from_badge)
            .max()
            .unwrap_or_default()
    }

    /// Parses a raw badge tag such as `moderator/1,subscriber/12`.
    pub fn from_badges_raw(raw: &str) -> Self {
        UserLevel::from_badges(
            raw.split(',')
                .filter(|b| !b.is_empty())
                .map(|b| b.split('/').next().unwrap_or_default()),
        )
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for UserLevel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UserLevel::User),
            1 => Ok(UserLevel::Vip),
            2 => Ok(UserLevel::Subscriber),
            3 => Ok(UserLevel::Moderator),
            other => Err(format!("Unknown user level: {}", other)),
        }
    }
}

impl From<UserLevel> for i32 {
    fn from(level: UserLevel) -> Self {
        level.as_i32()
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserLevel::User => write!(f, "user"),
            UserLevel::Vip => write!(f, "vip"),
            UserLevel::Subscriber => write!(f, "subscriber"),
            UserLevel::Moderator => write!(f, "moderator"),
        }
    }
}

/// Who sent a chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Platform user id (used by follow-age lookups).
    pub user_id: String,
    pub login: String,
    pub display_name: String,
    /// Badge names, without their version suffix.
    pub badges: Vec<String>,
}

impl CallerContext {
    pub fn new(user_id: &str, display_name: &str, badges_raw: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            login: display_name.to_lowercase(),
            display_name: display_name.to_string(),
            badges: badges_raw
                .split(',')
                .filter(|b| !b.is_empty())
                .map(|b| b.split('/').next().unwrap_or_default().to_string())
                .collect(),
        }
    }

    pub fn user_level(&self) -> UserLevel {
        UserLevel::from_badges(self.badges.iter().map(String::as_str))
    }
}
