// File: chanbot-core/src/cache/mod.rs

pub mod channel_registry;
pub mod channel_session;

pub use channel_registry::ChannelRegistry;
pub use channel_session::{ChannelSession, SessionCommand};
