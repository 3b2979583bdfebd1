//! One-shot reroll per hatch session
//!
//! Session lifecycle:
//! `None` -> `start_hatch_session` -> active (reroll available)
//! -> `execute_reroll` -> active (rerolled) -> `end_hatch_session` -> `None`.
//!
//! Starting a new session replaces the current one. Reroll statistics are
//! tracked separately on a caller-owned `RerollStats`.

use serde::{Deserialize, Serialize};

use crate::consts::HISTORY_CAPACITY;
use crate::history::BoundedHistory;
use crate::tier::{Rarity, RarityTable};
use crate::timestamp_ms;

/// The creature being hatched and its reroll state
#[derive(Debug, Clone, PartialEq)]
pub struct RerollSession<C> {
    pub original_creature: C,
    pub reroll_available: bool,
    pub has_rerolled: bool,
    pub rerolled_creature: Option<C>,
}

impl<C> RerollSession<C> {
    fn new(creature: C) -> Self {
        Self {
            original_creature: creature,
            reroll_available: true,
            has_rerolled: false,
            rerolled_creature: None,
        }
    }

    /// The creature the player ends up with
    pub fn final_creature(&self) -> &C {
        match (&self.rerolled_creature, self.has_rerolled) {
            (Some(rerolled), true) => rerolled,
            _ => &self.original_creature,
        }
    }

    /// Consume the session, keeping only the chosen creature
    pub fn into_final(self) -> C {
        match (self.rerolled_creature, self.has_rerolled) {
            (Some(rerolled), true) => rerolled,
            _ => self.original_creature,
        }
    }
}

/// One tracked reroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollRecord {
    pub original_rarity: Rarity,
    pub new_rarity: Rarity,
    pub was_successful: bool,
    /// Rank difference, negative for a downgrade
    pub improvement: i32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Per-player reroll statistics, persisted by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollStats {
    #[serde(default)]
    pub total_rerolls: u32,
    #[serde(default)]
    pub successful_rerolls: u32,
    #[serde(default)]
    pub reroll_history: BoundedHistory<RerollRecord, HISTORY_CAPACITY>,
    #[serde(default)]
    pub last_reroll_time: Option<f64>,
}

impl RerollStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a possibly missing state, logging when defaults are used
    pub fn or_default(stats: Option<RerollStats>, context: &str) -> Self {
        stats.unwrap_or_else(|| {
            log::warn!("{}: no reroll stats supplied, starting fresh", context);
            Self::default()
        })
    }

    /// Parse persisted JSON, falling back to empty stats
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(stats) => stats,
            Err(err) => {
                log::warn!("Could not parse reroll stats ({}), starting fresh", err);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            log::warn!("Could not serialize reroll stats: {}", err);
            "{}".to_string()
        })
    }
}

/// Advisory text shown next to the reroll button. Never enforced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerollAdvice {
    pub recommend: bool,
    pub message: String,
    pub odds: String,
}

/// Single-slot hatch session plus reroll bookkeeping
#[derive(Debug, Clone)]
pub struct RerollEngine<C> {
    session: Option<RerollSession<C>>,
    table: RarityTable,
    clock: fn() -> f64,
}

impl<C> Default for RerollEngine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RerollEngine<C> {
    pub fn new() -> Self {
        Self {
            session: None,
            table: RarityTable::standard(),
            clock: timestamp_ms,
        }
    }

    /// Table used for advice odds
    pub fn with_table(mut self, table: RarityTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    /// Begin a session for a freshly hatched creature, replacing any open one
    pub fn start_hatch_session(&mut self, creature: C) {
        if self.session.is_some() {
            log::info!("Replacing unfinished hatch session");
        }
        self.session = Some(RerollSession::new(creature));
        log::info!("Hatch session started");
    }

    pub fn session(&self) -> Option<&RerollSession<C>> {
        self.session.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn can_reroll(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.reroll_available && !s.has_rerolled)
    }

    /// Spend the session's reroll. Returns false (and changes nothing) when
    /// there is no session or the reroll was already used.
    pub fn execute_reroll(&mut self) -> bool {
        if !self.can_reroll() {
            log::warn!("Reroll refused: no session or reroll already used");
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.has_rerolled = true;
            session.reroll_available = false;
        }
        true
    }

    /// Store the creature produced by the reroll. Returns false without a
    /// session.
    pub fn set_rerolled_creature(&mut self, creature: C) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.rerolled_creature = Some(creature);
                true
            }
            None => {
                log::warn!("Rerolled creature set with no active hatch session");
                false
            }
        }
    }

    /// The rerolled creature if there is one, else the original
    pub fn final_creature(&self) -> Option<&C> {
        self.session.as_ref().map(RerollSession::final_creature)
    }

    /// Close the session once the chosen creature has been saved
    pub fn end_hatch_session(&mut self) -> Option<RerollSession<C>> {
        let ended = self.session.take();
        if ended.is_some() {
            log::info!("Hatch session ended");
        }
        ended
    }

    /// Record a reroll outcome in `stats`. Independent of the session.
    pub fn track_reroll(
        &self,
        original: Rarity,
        new: Rarity,
        stats: &mut RerollStats,
    ) -> RerollRecord {
        let improvement = new.rank() - original.rank();
        let was_successful = improvement > 0;
        let timestamp = (self.clock)();

        stats.total_rerolls = stats.total_rerolls.saturating_add(1);
        if was_successful {
            stats.successful_rerolls = stats.successful_rerolls.saturating_add(1);
        }
        let record = RerollRecord {
            original_rarity: original,
            new_rarity: new,
            was_successful,
            improvement,
            timestamp,
        };
        stats.reroll_history.append(record.clone());
        stats.last_reroll_time = Some(timestamp);

        log::debug!("Reroll {} -> {} ({:+})", original, new, improvement);
        record
    }

    pub fn reroll_advice(&self, rarity: Rarity) -> RerollAdvice {
        let chance = self.table.chance_of_better(rarity);
        let (recommend, message) = match rarity {
            Rarity::Common => (true, "Common hatch. A reroll is all upside."),
            Rarity::Uncommon => (true, "Not bad, but a reroll has a fair shot at rare or better."),
            Rarity::Rare => (false, "Rare is a solid pull. Reroll only if you feel lucky."),
            Rarity::Epic => (false, "Epic! A reroll will most likely downgrade it."),
            Rarity::Legendary => (false, "Legendary! Nothing beats this, keep it."),
        };
        RerollAdvice {
            recommend,
            message: message.to_string(),
            odds: format!("{}% chance of a better tier", chance),
        }
    }
}
