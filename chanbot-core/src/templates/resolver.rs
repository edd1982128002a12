// File: chanbot-core/src/templates/resolver.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};
use chanbot_common::models::{CallerContext, ChannelId, ChannelKey};
use chanbot_common::traits::ChannelDataApi;
use crate::Error;
use crate::templates::twitch_tags::{FollowAgeTag, FollowCountTag, GameTag, SubCountTag, UptimeTag};

pub const SENDER_TAG: &str = "{{sender}}";
pub const CHANNEL_TAG: &str = "{{channel}}";
pub const COMMANDS_TAG: &str = "{{commands}}";

/// What a dynamic tag gets to look at while fetching.
#[derive(Debug, Clone, Copy)]
pub struct TagContext<'a> {
    pub channel: &'a ChannelKey,
    pub channel_id: ChannelId,
    pub caller: &'a CallerContext,
}

/// A template tag whose value is fetched asynchronously (usually from the
/// platform API) at render time.
#[async_trait]
pub trait DynamicTag: Send + Sync {
    /// The literal tag, braces included, e.g. `{{uptime}}`.
    fn tag(&self) -> &'static str;

    /// Substituted when `resolve` fails.
    fn fallback(&self) -> &'static str;

    async fn resolve(&self, ctx: &TagContext<'_>) -> Result<String, Error>;
}

/// Values for the tags that are resolved synchronously from session state.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTags<'a> {
    /// Caller display name. `None` for timer messages, which leaves
    /// `{{sender}}` untouched.
    pub sender: Option<&'a str>,
    pub channel: &'a ChannelKey,
    /// Pre-joined list of public commands.
    pub commands: &'a str,
}

/// Replaces every occurrence of each tag with its value.
pub fn substitute(template: &str, pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .fold(template.to_string(), |acc, (tag, value)| acc.replace(tag, value))
}

/// Renders message templates: built-in tags first, then any registered
/// dynamic tags found in the text, fetched concurrently.
#[derive(Default, Clone)]
pub struct TemplateResolver {
    dynamic_tags: BTreeMap<&'static str, Arc<dyn DynamicTag>>,
}

impl TemplateResolver {
    /// A resolver with only the built-in tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with the Twitch data tags registered.
    pub fn with_twitch_tags(api: Arc<dyn ChannelDataApi>) -> Self {
        let mut resolver = Self::new();
        resolver.register(Arc::new(FollowAgeTag::new(api.clone())));
        resolver.register(Arc::new(FollowCountTag::new(api.clone())));
        resolver.register(Arc::new(SubCountTag::new(api.clone())));
        resolver.register(Arc::new(UptimeTag::new(api.clone())));
        resolver.register(Arc::new(GameTag::new(api)));
        resolver
    }

    /// Adds a dynamic tag, replacing (and returning) any previous one with the same name.
    pub fn register(&mut self, tag: Arc<dyn DynamicTag>) -> Option<Arc<dyn DynamicTag>> {
        self.dynamic_tags.insert(tag.tag(), tag)
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dynamic_tags.keys().copied()
    }

    pub fn render_builtin(&self, template: &str, builtins: &BuiltinTags<'_>) -> String {
        let mut pairs = vec![
            (CHANNEL_TAG, builtins.channel.to_string()),
            (COMMANDS_TAG, builtins.commands.to_string()),
        ];
        if let Some(sender) = builtins.sender {
            pairs.push((SENDER_TAG, sender.to_string()));
        }
        substitute(template, &pairs)
    }

    /// Full render. Never fails: a dynamic tag whose fetch errors is replaced
    /// by its fallback and everything else is substituted normally.
    pub async fn render(
        &self,
        template: &str,
        builtins: &BuiltinTags<'_>,
        ctx: &TagContext<'_>,
    ) -> String {
        let message = self.render_builtin(template, builtins);

        let present: Vec<&Arc<dyn DynamicTag>> = self
            .dynamic_tags
            .values()
            .filter(|t| message.contains(t.tag()))
            .collect();
        if present.is_empty() {
            return message;
        }

        let fetches = present.into_iter().map(|t| async move {
            match t.resolve(ctx).await {
                Ok(value) => (t.tag(), value),
                Err(e) => {
                    warn!(
                        "Tag {} failed for channel {}: {:?}; using fallback",
                        t.tag(), ctx.channel, e
                    );
                    (t.tag(), t.fallback().to_string())
                }
            }
        });
        let values = join_all(fetches).await;
        debug!("Resolved {} dynamic tag(s) for channel {}", values.len(), ctx.channel);

        substitute(&message, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct StaticTag(&'static str, Result<&'static str, &'static str>);

    #[async_trait]
    impl DynamicTag for StaticTag {
        fn tag(&self) -> &'static str {
            self.0
        }
        fn fallback(&self) -> &'static str {
            "n/a"
        }
        async fn resolve(&self, _ctx: &TagContext<'_>) -> Result<String, Error> {
            match self.1 {
                Ok(v) => Ok(v.to_string()),
                Err(e) => Err(Error::Platform(e.to_string())),
            }
        }
    }

    struct SlowTag(&'static str);

    #[async_trait]
    impl DynamicTag for SlowTag {
        fn tag(&self) -> &'static str {
            self.0
        }
        fn fallback(&self) -> &'static str {
            "slow-fallback"
        }
        async fn resolve(&self, _ctx: &TagContext<'_>) -> Result<String, Error> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("slow".into())
        }
    }

    fn caller() -> CallerContext {
        CallerContext::new("1", "Viewer", "")
    }

    #[test]
    fn builtins_replace_all_occurrences() {
        let r = TemplateResolver::new();
        let key = ChannelKey::new("chan");
        let out = r.render_builtin(
            "{{sender}} {{sender}} in {{channel}}: {{commands}}",
            &BuiltinTags { sender: Some("Bob"), channel: &key, commands: "!a, !b" },
        );
        assert_eq!(out, "Bob Bob in chan: !a, !b");
    }

    #[test]
    fn missing_sender_is_left_untouched() {
        let r = TemplateResolver::new();
        let key = ChannelKey::new("chan");
        let out = r.render_builtin(
            "hi {{sender}}",
            &BuiltinTags { sender: None, channel: &key, commands: "" },
        );
        assert_eq!(out, "hi {{sender}}");
    }

    #[tokio::test]
    async fn failing_tag_uses_fallback_and_others_still_render() {
        let mut r = TemplateResolver::new();
        r.register(Arc::new(StaticTag("{{uptime}}", Err("boom"))));
        r.register(Arc::new(StaticTag("{{game}}", Ok("Celeste"))));

        let key = ChannelKey::new("chan");
        let who = caller();
        let out = r
            .render(
                "Hi {{sender}}, uptime: {{uptime}}, game: {{game}} {{game}}",
                &BuiltinTags { sender: Some("Viewer"), channel: &key, commands: "" },
                &TagContext { channel: &key, channel_id: ChannelId(1), caller: &who },
            )
            .await;
        assert_eq!(out, "Hi Viewer, uptime: n/a, game: Celeste Celeste");
    }

    #[tokio::test(start_paused = true)]
    async fn dynamic_tags_resolve_concurrently() {
        let mut r = TemplateResolver::new();
        r.register(Arc::new(SlowTag("{{first}}")));
        r.register(Arc::new(SlowTag("{{second}}")));

        let key = ChannelKey::new("chan");
        let who = caller();
        let started = tokio::time::Instant::now();
        let out = r
            .render(
                "{{first}}/{{second}}",
                &BuiltinTags { sender: None, channel: &key, commands: "" },
                &TagContext { channel: &key, channel_id: ChannelId(1), caller: &who },
            )
            .await;
        assert_eq!(out, "slow/slow");
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn unknown_tags_are_ignored() {
        let r = TemplateResolver::new();
        let key = ChannelKey::new("chan");
        let who = caller();
        let out = r
            .render(
                "{{nothing}} here",
                &BuiltinTags { sender: None, channel: &key, commands: "" },
                &TagContext { channel: &key, channel_id: ChannelId(1), caller: &who },
            )
            .await;
        assert_eq!(out, "{{nothing}} here");
    }
}
