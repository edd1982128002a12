// chanbot-core/src/tasks/eviction.rs

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::debug;
use crate::cache::ChannelRegistry;

/// Spawns a background task that periodically evicts channels whose
/// inactivity deadline has passed.
pub fn spawn_eviction_task(registry: ChannelRegistry, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = registry.evict_expired(Instant::now());
            if !evicted.is_empty() {
                debug!("Eviction sweep removed {} channel(s)", evicted.len());
            }
        }
    })
}
