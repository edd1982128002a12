// File: chanbot-common/src/traits/mod.rs
pub mod platform_traits;
pub mod repository_traits;

pub use platform_traits::{ChannelDataApi, ChatTransport, IdentityResolver};
pub use repository_traits::ChannelConfigRepository;
