//! Hatch Roll - rarity, pity and reroll engine for a creature-hatching game
//!
//! Core modules:
//! - `tier`: Rarity tiers and the declarative probability/color table
//! - `engine`: Rarity rolls with pity tracking and tier color generation
//! - `reroll`: One-shot reroll gate per hatch session and reroll statistics
//! - `stats`: Progress text and aggregate rates over the bounded histories
//! - `color`: HSL <-> packed RGB helpers
//! - `tuning`: Data-driven roll balance

pub mod color;
pub mod engine;
pub mod history;
pub mod pity;
pub mod reroll;
pub mod rng;
pub mod stats;
pub mod tier;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use engine::{RarityEngine, RollOutcome};
pub use history::BoundedHistory;
pub use pity::{HatchRecord, PityState};
pub use reroll::{RerollAdvice, RerollEngine, RerollRecord, RerollSession, RerollStats};
pub use rng::{ScriptedRng, UnitRng};
pub use stats::{HatchStats, RerollSummary, StatisticsAggregator, TierRate};
pub use tier::{HslRange, Rarity, RarityTable, RarityTier};
pub use tuning::RollTuning;

/// Engine constants
pub mod consts {
    /// Entries kept in pity and reroll histories (oldest evicted first)
    pub const HISTORY_CAPACITY: usize = 20;

    /// Hatches without an epic+ before the pity roll kicks in
    pub const PITY_THRESHOLD: u32 = 10;
    /// Share of pity rolls that land on epic (the rest are legendary)
    pub const PITY_EPIC_CHANCE: f64 = 0.7;

    /// Reroll history lines shown in the summary panel
    pub const HISTORY_LINES: usize = 5;

    /// Tier probability weights must add up to this
    pub const TOTAL_WEIGHT: u32 = 100;
}

/// Wall-clock time in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn timestamp_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Normalize a hue in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_timestamp_is_positive() {
        assert!(timestamp_ms() > 0.0);
    }
}
