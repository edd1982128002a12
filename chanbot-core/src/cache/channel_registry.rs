// File: chanbot-core/src/cache/channel_registry.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use chanbot_common::models::{ChannelId, ChannelKey};
use chanbot_common::traits::{ChannelConfigRepository, ChatTransport, IdentityResolver};
use crate::Error;
use crate::cache::channel_session::ChannelSession;
use crate::config::EngineConfig;
use crate::templates::TemplateResolver;

type HydrationResult = Result<Arc<ChannelSession>, Arc<Error>>;

struct InflightHydration {
    id: u64,
    future: Shared<BoxFuture<'static, HydrationResult>>,
}

struct RegistryInner {
    sessions: DashMap<ChannelKey, Arc<ChannelSession>>,
    /// Hydrations that have started but not yet finished, one per key.
    /// Lock order: `inflight` before any `sessions` shard.
    inflight: Mutex<HashMap<ChannelKey, InflightHydration>>,
    next_hydration: AtomicU64,
    repo: Arc<dyn ChannelConfigRepository>,
    identity: Arc<dyn IdentityResolver>,
    transport: Arc<dyn ChatTransport>,
    resolver: Arc<TemplateResolver>,
    config: EngineConfig,
}

/// Keyed store of active channel sessions.
///
/// Cheap to clone; clones share the same store. Sessions are hydrated lazily
/// on first reference, and concurrent `resolve` calls for an uncached key all
/// wait on one shared hydration.
#[derive(Clone)]
pub struct ChannelRegistry {
    inner: Arc<RegistryInner>,
}

impl ChannelRegistry {
    pub fn new(
        repo: Arc<dyn ChannelConfigRepository>,
        identity: Arc<dyn IdentityResolver>,
        transport: Arc<dyn ChatTransport>,
        resolver: TemplateResolver,
        config: EngineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                sessions: DashMap::new(),
                inflight: Mutex::new(HashMap::new()),
                next_hydration: AtomicU64::new(1),
                repo,
                identity,
                transport,
                resolver: Arc::new(resolver),
                config,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.inner.resolver
    }

    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        self.inner.transport.clone()
    }

    /// Returns the session for `key`, hydrating it on a miss. Refreshes the
    /// session's eviction deadline either way.
    ///
    /// A session evicted while this call was waiting on it is never returned;
    /// the lookup starts over and lands on whatever replaced it.
    pub async fn resolve(&self, key: &ChannelKey) -> Result<Arc<ChannelSession>, Error> {
        loop {
            let session = self.lookup_or_hydrate(key).await?;
            session.touch();
            if session.is_live() {
                return Ok(session);
            }
            debug!("Channel {} was evicted while resolving, retrying", key);
        }
    }

    async fn lookup_or_hydrate(&self, key: &ChannelKey) -> Result<Arc<ChannelSession>, Error> {
        if let Some(session) = self.peek(key) {
            return Ok(session);
        }

        let hydration = {
            let mut inflight = self.inner.inflight.lock();
            // Re-check under the lock: a hydration may have just finished.
            if let Some(session) = self.peek(key) {
                return Ok(session);
            }
            match inflight.get(key) {
                Some(existing) => {
                    debug!("Joining in-flight hydration of channel {}", key);
                    existing.future.clone()
                }
                None => {
                    let id = self.inner.next_hydration.fetch_add(1, Ordering::Relaxed);
                    let future =
                        hydrate(Arc::downgrade(&self.inner), key.clone(), id).boxed().shared();
                    inflight.insert(key.clone(), InflightHydration { id, future: future.clone() });
                    future
                }
            }
        };

        hydration
            .await
            .map_err(|source| Error::Hydration { channel: key.to_string(), source })
    }

    /// Cached session without touching its deadline.
    pub fn peek(&self, key: &ChannelKey) -> Option<Arc<ChannelSession>> {
        self.inner.sessions.get(key).map(|s| s.value().clone())
    }

    /// Removes the session and cancels all of its scheduled work. An
    /// in-flight hydration for the key is abandoned: its session is shut down
    /// and never cached, and callers waiting on it resolve again.
    ///
    /// Returns whether a cached session was removed.
    pub fn evict(&self, key: &ChannelKey) -> bool {
        let removed = {
            let mut inflight = self.inner.inflight.lock();
            if inflight.remove(key).is_some() {
                debug!("Abandoned in-flight hydration of channel {}", key);
            }
            self.inner.sessions.remove(key)
        };

        match removed {
            Some((_, session)) => {
                session.shutdown();
                info!("Removed channel {} from active channels", key);
                true
            }
            None => false,
        }
    }

    /// Evict followed by a fresh hydration.
    pub async fn invalidate(&self, key: &ChannelKey) -> Result<Arc<ChannelSession>, Error> {
        self.evict(key);
        self.resolve(key).await
    }

    /// Evicts the cached session with this id, if any, returning its key.
    pub fn evict_by_id(&self, id: ChannelId) -> Option<ChannelKey> {
        let key = self.key_for_id(id)?;
        self.evict(&key).then_some(key)
    }

    /// Rehydrates the channel with this id if it is cached. Uncached channels
    /// pick up new configuration on their next hydration anyway.
    pub async fn on_configuration_changed(
        &self,
        id: ChannelId,
    ) -> Result<Option<Arc<ChannelSession>>, Error> {
        match self.key_for_id(id) {
            Some(key) => self.invalidate(&key).await.map(Some),
            None => {
                debug!("Configuration changed for uncached channel id {}", id);
                Ok(None)
            }
        }
    }

    /// Evicts every session whose deadline is at or before `now`.
    pub fn evict_expired(&self, now: Instant) -> Vec<ChannelKey> {
        let candidates: Vec<ChannelKey> = self
            .inner
            .sessions
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = Vec::new();
        for key in candidates {
            // The session may have been touched since the scan.
            let removed = {
                let _inflight = self.inner.inflight.lock();
                self.inner.sessions.remove_if(&key, |_, s| s.is_expired(now))
            };
            if let Some((_, session)) = removed {
                session.shutdown();
                info!("Removed channel {} from active channels", key);
                evicted.push(key);
            }
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.inner.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.sessions.is_empty()
    }

    pub fn keys(&self) -> Vec<ChannelKey> {
        self.inner.sessions.iter().map(|e| e.key().clone()).collect()
    }

    /// Evicts everything.
    pub fn shutdown(&self) {
        self.inner.inflight.lock().clear();
        for key in self.keys() {
            self.evict(&key);
        }
    }

    fn key_for_id(&self, id: ChannelId) -> Option<ChannelKey> {
        self.inner
            .sessions
            .iter()
            .find(|entry| entry.value().id() == id)
            .map(|entry| entry.key().clone())
    }
}

async fn hydrate(inner: Weak<RegistryInner>, key: ChannelKey, id: u64) -> HydrationResult {
    let Some(inner) = inner.upgrade() else {
        return Err(Arc::new(Error::NotFound("channel registry has been dropped".into())));
    };
    let loaded = inner.load_session(&key).await;
    inner.finish_hydration(&key, id, loaded)
}

impl RegistryInner {
    async fn load_session(&self, key: &ChannelKey) -> Result<ChannelSession, Error> {
        let identity = self.identity.resolve_channel_id(key).await?;
        if identity.is_renamed_from(key) {
            warn!(
                "Channel {} (id {}) is now known as {}; persisted name is stale",
                key, identity.id, identity.login
            );
        }

        let (commands, events, timers) = tokio::try_join!(
            self.repo.fetch_commands(identity.id),
            self.repo.fetch_events(identity.id),
            self.repo.fetch_timers(identity.id),
        )?;
        debug!(
            "Loaded {} command(s), {} event(s), {} timer(s) for channel {}",
            commands.len(), events.len(), timers.len(), key
        );

        Ok(ChannelSession::new(
            key.clone(),
            identity.id,
            commands,
            events,
            timers,
            self.config.channel_ttl(),
        ))
    }

    fn finish_hydration(
        &self,
        key: &ChannelKey,
        id: u64,
        loaded: Result<ChannelSession, Error>,
    ) -> HydrationResult {
        let mut inflight = self.inflight.lock();
        let current = inflight.get(key).is_some_and(|h| h.id == id);
        if current {
            inflight.remove(key);
        }

        let session = match loaded {
            Ok(session) => Arc::new(session),
            Err(e) => {
                error!("Failed to hydrate channel {}: {:?}", key, e);
                return Err(Arc::new(e));
            }
        };

        if current {
            session.start_timers(self.transport.clone(), &self.resolver, &self.config.command_prefix);
            self.sessions.insert(key.clone(), session.clone());
            info!("Added channel {} to active channels", key);
        } else {
            debug!("Hydration of channel {} was superseded by an eviction", key);
            session.shutdown();
        }
        Ok(session)
    }
}
