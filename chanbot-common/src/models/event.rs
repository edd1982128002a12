use serde::{Serialize, Deserialize};

/// Per-channel announcement template for one platform event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    pub message: String,
    pub enabled: bool,
}

/// A platform event (follow, raid, subscription...) routed to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlatformEvent {
    Follow {
        user: String,
    },
    Raid {
        user: String,
        viewers: u32,
    },
    Host {
        user: String,
        viewers: u32,
        #[serde(default)]
        autohost: bool,
    },
    Sub {
        user: String,
        plan: String,
    },
    Resub {
        user: String,
        months: u32,
        streak: u32,
        plan: String,
    },
    #[serde(rename = "subgift")]
    SubGift {
        user: String,
        recipient: String,
        total: u32,
        streak: u32,
        plan: String,
    },
    #[serde(rename = "mysterygift")]
    MysteryGift {
        user: String,
        count: u32,
        total: u32,
        plan: String,
    },
    #[serde(rename = "giftupgrade")]
    GiftUpgrade {
        user: String,
        gifter: String,
    },
    #[serde(rename = "anongiftupgrade")]
    AnonGiftUpgrade {
        user: String,
    },
    Cheer {
        user: String,
        amount: u32,
    },
}

impl PlatformEvent {
    /// Name of the `EventConfig` this event is announced with.
    pub fn name(&self) -> &'static str {
        match self {
            PlatformEvent::Follow { .. } => "follow",
            PlatformEvent::Raid { .. } => "raid",
            PlatformEvent::Host { .. } => "host",
            PlatformEvent::Sub { .. } => "sub",
            PlatformEvent::Resub { .. } => "resub",
            PlatformEvent::SubGift { .. } => "subgift",
            PlatformEvent::MysteryGift { .. } => "mysterygift",
            PlatformEvent::GiftUpgrade { .. } => "giftupgrade",
            PlatformEvent::AnonGiftUpgrade { .. } => "anongiftupgrade",
            PlatformEvent::Cheer { .. } => "cheer",
        }
    }

    /// Auto-hosts are never announced.
    pub fn is_announceable(&self) -> bool {
        !matches!(self, PlatformEvent::Host { autohost: true, .. })
    }

    /// Event-specific `(tag, value)` substitutions.
    pub fn substitutions(&self) -> Vec<(&'static str, String)> {
        match self {
            PlatformEvent::Follow { user } | PlatformEvent::AnonGiftUpgrade { user } => {
                vec![("{{user}}", user.clone())]
            }
            PlatformEvent::Raid { user, viewers } | PlatformEvent::Host { user, viewers, .. } => vec![
                ("{{user}}", user.clone()),
                ("{{viewers}}", viewers.to_string()),
            ],
            PlatformEvent::Sub { user, plan } => vec![
                ("{{user}}", user.clone()),
                ("{{type}}", plan.clone()),
            ],
            PlatformEvent::Resub { user, months, streak, plan } => vec![
                ("{{user}}", user.clone()),
                ("{{months}}", months.to_string()),
                ("{{streak}}", streak.to_string()),
                ("{{type}}", plan.clone()),
            ],
            PlatformEvent::SubGift { user, recipient, total, streak, plan } => vec![
                ("{{user}}", user.clone()),
                ("{{total}}", total.to_string()),
                ("{{streak}}", streak.to_string()),
                ("{{recipient}}", recipient.clone()),
                ("{{type}}", plan.clone()),
            ],
            PlatformEvent::MysteryGift { user, count, total, plan } => vec![
                ("{{user}}", user.clone()),
                ("{{total}}", total.to_string()),
                ("{{count}}", count.to_string()),
                ("{{type}}", plan.clone()),
            ],
            PlatformEvent::GiftUpgrade { user, gifter } => vec![
                ("{{user}}", user.clone()),
                ("{{gifter}}", gifter.clone()),
            ],
            PlatformEvent::Cheer { user, amount } => vec![
                ("{{user}}", user.clone()),
                ("{{amount}}", amount.to_string()),
            ],
        }
    }
}
