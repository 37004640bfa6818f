//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A simulation tick. One tick = one batch of game-minutes supplied
/// by the external clock collaborator.
pub type Tick = u64;

/// Game time in minutes. Monotonically increasing.
pub type Minutes = f64;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// Integer currency. All sale totals are floored to whole cash.
pub type Cash = i64;

/// The three tradeable drugs. Every balance table in `SimConfig`
/// is keyed by this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Drug {
    Weed,
    Koks,
    Meth,
}

impl Drug {
    pub const ALL: [Drug; 3] = [Drug::Weed, Drug::Koks, Drug::Meth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weed => "weed",
            Self::Koks => "koks",
            Self::Meth => "meth",
        }
    }
}

/// Urgency tier of a purchase request. Controls requested grams,
/// price ceiling, and expiry window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Desperate,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Desperate => "desperate",
        }
    }
}

/// Clamp any percentage-valued field to [0, 100].
/// Applied on every mutation of loyalty, satisfaction, addiction,
/// quality, purity, water and progress-at-rest.
pub fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}
