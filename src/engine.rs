//! Rarity rolls with pity tracking
//!
//! A roll first checks the pity counter: once `pity_threshold` hatches have
//! passed without an epic or legendary, that same roll is forced onto the
//! pity table (epic or legendary). Otherwise it is a standard weighted roll
//! over the tier table.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::color;
use crate::pity::{HatchRecord, PityState};
use crate::reroll::RerollEngine;
use crate::rng::UnitRng;
use crate::stats::StatisticsAggregator;
use crate::tier::{Rarity, RarityTable, RarityTier};
use crate::timestamp_ms;
use crate::tuning::RollTuning;

/// Result of `roll_rarity`: the tier plus the state to persist
#[derive(Debug, Clone, PartialEq)]
pub struct RollOutcome {
    pub rarity: Rarity,
    pub was_pity: bool,
    pub pity: PityState,
}

/// Owns the tier table and the RNG used for rolls and colors
#[derive(Debug, Clone)]
pub struct RarityEngine<R = Pcg32> {
    table: RarityTable,
    tuning: RollTuning,
    rng: R,
    clock: fn() -> f64,
}

impl RarityEngine<Pcg32> {
    /// Engine with the standard table and a seeded PCG generator
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }
}

impl<R: UnitRng> RarityEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            table: RarityTable::standard(),
            tuning: RollTuning::default(),
            rng,
            clock: timestamp_ms,
        }
    }

    pub fn with_tuning(mut self, tuning: RollTuning) -> Self {
        self.tuning = tuning.sanitized();
        self
    }

    pub fn with_table(mut self, table: RarityTable) -> Self {
        self.table = table;
        self
    }

    /// Override the timestamp source for history entries
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    pub fn table(&self) -> &RarityTable {
        &self.table
    }

    pub fn tuning(&self) -> &RollTuning {
        &self.tuning
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Reroll engine sharing this engine's tier table
    pub fn reroll_engine<C>(&self) -> RerollEngine<C> {
        RerollEngine::new().with_table(self.table.clone())
    }

    /// Statistics over this engine's tier table and tuning
    pub fn stats_aggregator(&self) -> StatisticsAggregator {
        StatisticsAggregator::new(self.table.clone(), self.tuning.clone())
    }

    /// Roll a rarity against a (possibly missing) pity state.
    ///
    /// Missing state starts fresh. The returned outcome carries the updated
    /// state for the caller to persist.
    pub fn roll_rarity(&mut self, pity: Option<PityState>) -> RollOutcome {
        let mut pity = PityState::or_default(pity, "roll_rarity");
        let record = self.roll_into(&mut pity);
        RollOutcome {
            rarity: record.rarity,
            was_pity: record.was_pity,
            pity,
        }
    }

    /// Roll and update `pity` in place, returning the new history entry
    pub fn roll_into(&mut self, pity: &mut PityState) -> HatchRecord {
        if pity.hatches_since_epic >= self.tuning.pity_threshold {
            pity.guaranteed_epic_next = true;
        }

        let was_pity = pity.guaranteed_epic_next;
        let rarity = if was_pity {
            let rarity = self.pity_roll();
            pity.hatches_since_epic = 0;
            pity.guaranteed_epic_next = false;
            pity.pities_triggered = pity.pities_triggered.saturating_add(1);
            log::info!(
                "Pity triggered ({} so far): rolled {}",
                pity.pities_triggered,
                rarity
            );
            rarity
        } else {
            self.standard_roll()
        };

        if rarity.is_epic_or_better() {
            pity.hatches_since_epic = 0;
        } else {
            pity.hatches_since_epic = pity.hatches_since_epic.saturating_add(1);
        }
        pity.total_hatches = pity.total_hatches.saturating_add(1);

        let record = HatchRecord {
            rarity,
            timestamp: (self.clock)(),
            was_pity,
        };
        pity.history.append(record.clone());

        log::debug!(
            "Rolled {} (pity {}, hatches since epic {})",
            rarity,
            was_pity,
            pity.hatches_since_epic
        );
        record
    }

    /// Weighted roll over the tier table, ignoring pity
    pub fn standard_roll(&mut self) -> Rarity {
        let roll = self.rng.next_unit() * 100.0;
        self.table.pick(roll)
    }

    fn pity_roll(&mut self) -> Rarity {
        if self.rng.next_unit() < self.tuning.pity_epic_chance {
            Rarity::Epic
        } else {
            Rarity::Legendary
        }
    }

    /// Random body color inside the tier's HSL ranges
    pub fn generate_color_for_rarity(&mut self, rarity: Rarity) -> u32 {
        let tier = self.table.tier(rarity);
        color::color_for_tier(tier, &mut self.rng)
    }

    /// Like `generate_color_for_rarity`, for a raw id (unknown ids use common)
    pub fn generate_color_for_id(&mut self, id: &str) -> u32 {
        self.generate_color_for_rarity(Rarity::from_id_or_common(id))
    }

    /// Accent color derived from a base color
    pub fn shift_hue(&self, base: u32, shift_degrees: f64) -> u32 {
        color::shift_hue(base, shift_degrees)
    }

    /// Display metadata for a rarity id (unknown ids use common)
    pub fn rarity_info(&self, id: &str) -> &RarityTier {
        self.table.tier_for_id(id)
    }

    pub fn tiers(&self) -> impl Iterator<Item = &RarityTier> {
        self.table.iter()
    }
}
