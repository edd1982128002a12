// File: chanbot-common/src/models/mod.rs
pub mod channel;
pub mod command;
pub mod event;
pub mod stream;
pub mod timer;
pub mod user;

pub use channel::{ChannelId, ChannelIdentity, ChannelKey};
pub use command::Command;
pub use event::{EventConfig, PlatformEvent};
pub use stream::StreamInfo;
pub use timer::TimerConfig;
pub use user::{CallerContext, UserLevel};
