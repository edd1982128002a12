// File: chanbot-core/src/tasks/cooldown.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Per-channel, per-alias cooldown flag.
///
/// Shared by every caller in the channel: once activated, the command is
/// blocked for everyone until the one-shot clear fires.
#[derive(Debug, Default)]
pub struct CommandCooldown {
    on_cooldown: Arc<AtomicBool>,
}

impl CommandCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.on_cooldown.load(Ordering::Acquire)
    }

    /// Sets the flag and schedules its clear after `duration`.
    ///
    /// Returns `false` (and schedules nothing) if the flag was already set.
    /// The clear is a child of `cancel`; cancelling it leaves the flag set,
    /// which is harmless because the owning session is gone.
    pub fn try_activate(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        if self
            .on_cooldown
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let deadline = Instant::now() + duration;
        let flag = self.on_cooldown.clone();
        let token = cancel.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!("cooldown clear cancelled");
                }
                _ = sleep_until(deadline) => {
                    flag.store(false, Ordering::Release);
                }
            }
        });
        true
    }
}
