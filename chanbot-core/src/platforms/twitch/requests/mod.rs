// File: chanbot-core/src/platforms/twitch/requests/mod.rs

pub mod follow;
pub mod stream;
pub mod subscriptions;
pub mod users;
