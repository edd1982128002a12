// File: chanbot-core/src/platforms/mod.rs

pub mod twitch;

pub use twitch::TwitchHelixClient;
