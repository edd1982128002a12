// File: chanbot-core/tests/test_utils/mod.rs
//
// In-memory collaborators for driving the engine without Postgres or Twitch.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use chanbot_common::models::{
    ChannelId, ChannelIdentity, ChannelKey, Command, EventConfig, StreamInfo, TimerConfig, UserLevel,
};
use chanbot_common::traits::{ChannelConfigRepository, ChannelDataApi, ChatTransport, IdentityResolver};
use chanbot_core::templates::TemplateResolver;
use chanbot_core::{ChannelRegistry, EngineConfig, Error};

/// Channel configuration keyed by id. Counts `fetch_commands` calls as
/// hydrations.
#[derive(Default)]
pub struct InMemoryConfigRepo {
    commands: Mutex<HashMap<ChannelId, Vec<Command>>>,
    events: Mutex<HashMap<ChannelId, Vec<EventConfig>>>,
    timers: Mutex<HashMap<ChannelId, Vec<TimerConfig>>>,
    hydrations: AtomicUsize,
}

impl InMemoryConfigRepo {
    pub fn set_commands(&self, id: ChannelId, commands: Vec<Command>) {
        self.commands.lock().insert(id, commands);
    }

    pub fn set_events(&self, id: ChannelId, events: Vec<EventConfig>) {
        self.events.lock().insert(id, events);
    }

    pub fn set_timers(&self, id: ChannelId, timers: Vec<TimerConfig>) {
        self.timers.lock().insert(id, timers);
    }

    pub fn hydrations(&self) -> usize {
        self.hydrations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelConfigRepository for InMemoryConfigRepo {
    async fn fetch_commands(&self, channel_id: ChannelId) -> Result<Vec<Command>, Error> {
        self.hydrations.fetch_add(1, Ordering::SeqCst);
        Ok(self.commands.lock().get(&channel_id).cloned().unwrap_or_default())
    }

    async fn fetch_events(&self, channel_id: ChannelId) -> Result<Vec<EventConfig>, Error> {
        Ok(self.events.lock().get(&channel_id).cloned().unwrap_or_default())
    }

    async fn fetch_timers(&self, channel_id: ChannelId) -> Result<Vec<TimerConfig>, Error> {
        Ok(self.timers.lock().get(&channel_id).cloned().unwrap_or_default())
    }
}

/// Resolves known logins after an optional delay. Unknown logins fail.
pub struct StaticIdentity {
    known: Mutex<HashMap<ChannelKey, ChannelIdentity>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticIdentity {
    pub fn new(delay: Duration) -> Self {
        Self { known: Mutex::new(HashMap::new()), delay, calls: AtomicUsize::new(0) }
    }

    pub fn add(&self, login: &str, id: i64) {
        self.known.lock().insert(
            ChannelKey::new(login),
            ChannelIdentity { id: ChannelId(id), login: login.to_string() },
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve_channel_id(&self, key: &ChannelKey) -> Result<ChannelIdentity, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.known
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("channel {key}")))
    }
}

/// Records every outgoing line.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(ChannelKey, String)>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<(ChannelKey, String)> {
        self.sent.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, channel: &ChannelKey, text: &str) -> Result<(), Error> {
        self.sent.lock().push((channel.clone(), text.to_string()));
        Ok(())
    }
}

/// Channel data where every stream lookup fails and counts are fixed.
pub struct FlakyDataApi;

#[async_trait]
impl ChannelDataApi for FlakyDataApi {
    async fn fetch_follow_date(
        &self,
        _viewer_id: &str,
        _channel_id: ChannelId,
    ) -> Result<Option<DateTime<Utc>>, Error> {
        Ok(None)
    }

    async fn fetch_follower_count(&self, _channel_id: ChannelId) -> Result<u64, Error> {
        Ok(42)
    }

    async fn fetch_subscriber_count(&self, _channel_id: ChannelId) -> Result<u64, Error> {
        Ok(7)
    }

    async fn fetch_stream(&self, _channel: &ChannelKey) -> Result<Option<StreamInfo>, Error> {
        Err(Error::Platform("Twitch API error: HTTP 503".into()))
    }
}

pub struct Harness {
    pub repo: Arc<InMemoryConfigRepo>,
    pub identity: Arc<StaticIdentity>,
    pub transport: Arc<RecordingTransport>,
    pub registry: ChannelRegistry,
}

/// A registry over fresh mocks with `streamer` known as id 1001.
pub fn harness(identity_delay: Duration) -> Harness {
    harness_with(identity_delay, TemplateResolver::with_twitch_tags(Arc::new(FlakyDataApi)))
}

pub fn harness_with(identity_delay: Duration, resolver: TemplateResolver) -> Harness {
    let repo = Arc::new(InMemoryConfigRepo::default());
    let identity = Arc::new(StaticIdentity::new(identity_delay));
    identity.add("streamer", STREAMER_ID.0);
    let transport = Arc::new(RecordingTransport::default());
    let config = EngineConfig { bot_username: Some("chanbot".into()), ..Default::default() };
    let registry = ChannelRegistry::new(
        repo.clone(),
        identity.clone(),
        transport.clone(),
        resolver,
        config,
    );
    Harness { repo, identity, transport, registry }
}

pub const STREAMER_ID: ChannelId = ChannelId(1001);

pub fn streamer() -> ChannelKey {
    ChannelKey::new("streamer")
}

pub fn command(alias: &str, message: &str, cooldown: u32, level: UserLevel) -> Command {
    Command {
        alias: alias.into(),
        message: message.into(),
        cooldown_seconds: cooldown,
        min_user_level: level,
    }
}

pub fn timer(name: &str, message: &str, interval: u32, threshold: u32) -> TimerConfig {
    TimerConfig {
        name: name.into(),
        message: message.into(),
        interval_seconds: interval,
        message_threshold: threshold,
        enabled: true,
    }
}

pub fn event(name: &str, message: &str, enabled: bool) -> EventConfig {
    EventConfig { name: name.into(), message: message.into(), enabled }
}

/// Lets spawned tasks run after a paused-clock `advance`.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
