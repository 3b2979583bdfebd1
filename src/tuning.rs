//! Roll balance tuning
//!
//! Loaded from JSON so balance can change without a rebuild; anything missing
//! or out of range falls back to the shipped values.

use serde::{Deserialize, Serialize};

use crate::consts::{HISTORY_CAPACITY, HISTORY_LINES, PITY_EPIC_CHANCE, PITY_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RollTuning {
    /// Non-epic hatches that trigger the pity roll
    pub pity_threshold: u32,
    /// Share of pity rolls that land on epic (the rest are legendary)
    pub pity_epic_chance: f64,
    /// Reroll history lines shown in summaries
    pub history_lines: usize,
}

impl Default for RollTuning {
    fn default() -> Self {
        Self {
            pity_threshold: PITY_THRESHOLD,
            pity_epic_chance: PITY_EPIC_CHANCE,
            history_lines: HISTORY_LINES,
        }
    }
}

impl RollTuning {
    /// Parse tuning JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<RollTuning>(json) {
            Ok(tuning) => {
                log::info!("Loaded roll tuning");
                tuning.sanitized()
            }
            Err(err) => {
                log::warn!("Invalid roll tuning ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Clamp values into usable ranges
    pub fn sanitized(mut self) -> Self {
        if self.pity_threshold == 0 {
            log::warn!("pity_threshold must be at least 1, using 1");
            self.pity_threshold = 1;
        }
        if !self.pity_epic_chance.is_finite() {
            self.pity_epic_chance = PITY_EPIC_CHANCE;
        }
        self.pity_epic_chance = self.pity_epic_chance.clamp(0.0, 1.0);
        self.history_lines = self.history_lines.clamp(1, HISTORY_CAPACITY);
        self
    }
}
