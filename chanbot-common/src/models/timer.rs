use serde::{Serialize, Deserialize};

/// A recurring announcement, gated on chat activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub name: String,
    pub message: String,
    pub interval_seconds: u32,
    /// Minimum chat messages since the last firing before the timer may fire again.
    pub message_threshold: u32,
    pub enabled: bool,
}
