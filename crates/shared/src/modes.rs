use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EngineError;

/// Map display modes. Each one selects pin geometry and how eagerly pins merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Activity,
    Explore,
    Events,
    Train,
    Social,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Activity,
        Mode::Explore,
        Mode::Events,
        Mode::Train,
        Mode::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Activity => "activity",
            Mode::Explore => "explore",
            Mode::Events => "events",
            Mode::Train => "train",
            Mode::Social => "social",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownMode(s.to_string()))
    }
}

/// Pin dimensions in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeConfig {
    pub pin: PinSize,
    /// Added to both pin dimensions to get the collision ellipse radii.
    /// Positive merges pins that are merely close, zero only on overlap,
    /// negative tolerates some overlap.
    pub cluster_padding: f64,
}

impl ModeConfig {
    /// Semi-axes of the collision ellipse `(rx, ry)`.
    pub fn effective_radii(&self) -> (f64, f64) {
        (
            self.pin.width + self.cluster_padding,
            self.pin.height + self.cluster_padding,
        )
    }
}

// Small round pins: cluster when centers are within 32px.
const SMALL_PIN: ModeConfig = ModeConfig {
    pin: PinSize {
        width: 22.0,
        height: 22.0,
    },
    cluster_padding: 10.0,
};

// Avatar cards: cluster only on actual overlap.
const SOCIAL_CARD: ModeConfig = ModeConfig {
    pin: PinSize {
        width: 70.0,
        height: 60.0,
    },
    cluster_padding: 0.0,
};

/// Geometry for a display mode.
pub fn config_for(mode: Mode) -> ModeConfig {
    match mode {
        Mode::Activity | Mode::Explore | Mode::Events | Mode::Train => SMALL_PIN,
        Mode::Social => SOCIAL_CARD,
    }
}
