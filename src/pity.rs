//! Per-player pity state
//!
//! Owned and persisted by the caller; the engine takes it in and hands back
//! the updated copy after each roll.

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_CAPACITY;
use crate::history::BoundedHistory;
use crate::tier::Rarity;

/// One hatch in the pity history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchRecord {
    pub rarity: Rarity,
    /// Unix timestamp (ms)
    pub timestamp: f64,
    /// Rolled by the pity guarantee rather than the standard table
    pub was_pity: bool,
}

/// Pity counter and hatch history for one player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PityState {
    /// Hatches since the last epic or legendary
    #[serde(default)]
    pub hatches_since_epic: u32,
    /// Set and consumed within the roll that reaches the pity threshold
    #[serde(default)]
    pub guaranteed_epic_next: bool,
    #[serde(default)]
    pub total_hatches: u32,
    #[serde(default)]
    pub pities_triggered: u32,
    #[serde(default)]
    pub history: BoundedHistory<HatchRecord, HISTORY_CAPACITY>,
}

impl PityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a possibly missing state, logging when defaults are used
    pub fn or_default(state: Option<PityState>, context: &str) -> Self {
        state.unwrap_or_else(|| {
            log::warn!("{}: no pity state supplied, starting fresh", context);
            Self::default()
        })
    }

    /// Parse persisted JSON, falling back to a fresh state
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("Could not parse pity state ({}), starting fresh", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            log::warn!("Could not serialize pity state: {}", err);
            "{}".to_string()
        })
    }
}
