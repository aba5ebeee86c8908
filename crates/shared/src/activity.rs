use serde::{Deserialize, Serialize};

/// Players at or above this count mark a court as busy.
pub const HIGH_ACTIVITY_PLAYERS: u32 = 20;
pub const MEDIUM_ACTIVITY_PLAYERS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Low => write!(f, "low"),
            ActivityLevel::Medium => write!(f, "medium"),
            ActivityLevel::High => write!(f, "high"),
        }
    }
}

pub fn level_for(total_players: u32) -> ActivityLevel {
    if total_players >= HIGH_ACTIVITY_PLAYERS {
        ActivityLevel::High
    } else if total_players >= MEDIUM_ACTIVITY_PLAYERS {
        ActivityLevel::Medium
    } else {
        ActivityLevel::Low
    }
}

/// Marker colour as a hex string.
pub fn color_for(level: ActivityLevel) -> &'static str {
    match level {
        ActivityLevel::High => "#FF3B30",
        ActivityLevel::Medium => "#FF9500",
        ActivityLevel::Low => "#34C759",
    }
}
