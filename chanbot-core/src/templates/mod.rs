// File: chanbot-core/src/templates/mod.rs

pub mod resolver;
pub mod twitch_tags;

pub use resolver::{BuiltinTags, DynamicTag, TagContext, TemplateResolver, substitute};
pub use twitch_tags::{FollowAgeTag, FollowCountTag, GameTag, SubCountTag, UptimeTag};
