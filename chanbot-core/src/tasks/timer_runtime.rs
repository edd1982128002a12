// File: chanbot-core/src/tasks/timer_runtime.rs

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use chanbot_common::models::{ChannelKey, TimerConfig};
use chanbot_common::traits::ChatTransport;

/// One scheduled announcer of a channel session.
///
/// Counts chat messages since its last firing; every `interval_seconds` the
/// ticker checks the count against `message_threshold` and, if reached,
/// sends the message and resets the count in the same step.
#[derive(Debug)]
pub struct TimerRuntime {
    config: TimerConfig,
    messages_since_last_fire: Arc<AtomicU32>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TimerRuntime {
    /// `parent` is the owning session's token; cancelling it stops this timer.
    pub fn new(config: TimerConfig, parent: &CancellationToken) -> Self {
        Self {
            config,
            messages_since_last_fire: Arc::new(AtomicU32::new(0)),
            cancel: parent.child_token(),
            handle: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn record_message(&self) {
        self.messages_since_last_fire.fetch_add(1, Ordering::AcqRel);
    }

    pub fn messages_since_last_fire(&self) -> u32 {
        self.messages_since_last_fire.load(Ordering::Acquire)
    }

    /// Resets the counter to 0 iff it has reached the threshold.
    /// Returns whether the timer should fire.
    pub fn try_fire(&self) -> bool {
        try_fire(&self.messages_since_last_fire, self.config.message_threshold)
    }

    pub fn period(&self) -> Duration {
        period_of(&self.config)
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Spawns the recurring ticker. `text` is the already-rendered message.
    /// Calling this twice is a no-op.
    pub fn start(&self, channel: ChannelKey, text: String, transport: Arc<dyn ChatTransport>) {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return;
        }

        let period = self.period();
        let counter = self.messages_since_last_fire.clone();
        let threshold = self.config.message_threshold;
        let name = self.config.name.clone();
        let cancel = self.cancel.clone();
        let start = Instant::now() + period;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                // A tick racing with eviction must not send.
                if cancel.is_cancelled() {
                    break;
                }
                if !try_fire(&counter, threshold) {
                    continue;
                }

                debug!("Timer '{}' firing in channel {}", name, channel);
                let send = AssertUnwindSafe(transport.send(&channel, &text)).catch_unwind();
                match send.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!("Timer '{}' failed to send in channel {}: {:?}", name, channel, e);
                    }
                    Err(_) => {
                        error!("Timer '{}' panicked while sending in channel {}", name, channel);
                    }
                }
            }
            debug!("Timer '{}' for channel {} stopped", name, channel);
        }));
    }

    /// Cancels the ticker. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for TimerRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}

fn try_fire(counter: &AtomicU32, threshold: u32) -> bool {
    counter
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
            (count >= threshold).then_some(0)
        })
        .is_ok()
}

fn period_of(config: &TimerConfig) -> Duration {
    if config.interval_seconds == 0 {
        warn!("Timer '{}' has a zero interval; clamping to 1s", config.name);
        return Duration::from_secs(1);
    }
    Duration::from_secs(u64::from(config.interval_seconds))
}
