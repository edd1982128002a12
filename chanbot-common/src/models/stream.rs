use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Live stream details used by the `{{uptime}}` and `{{game}}` tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub started_at: DateTime<Utc>,
    pub game_name: String,
    pub title: String,
    pub viewer_count: u32,
}
