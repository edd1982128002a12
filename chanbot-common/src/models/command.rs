use serde::{Serialize, Deserialize};
use crate::models::user::UserLevel;

/// A custom chat command (e.g. `!lurk`) configured for one channel.
///
/// Alias uniqueness within a channel is guaranteed by persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub alias: String,
    pub message: String,
    pub cooldown_seconds: u32,
    pub min_user_level: UserLevel,
}

impl Command {
    pub fn is_public(&self) -> bool {
        self.min_user_level == UserLevel::User
    }
}
