//! Browser bindings for the hatching scene
//!
//! State objects cross the boundary as JSON strings so the JS side keeps
//! ownership of persistence. Creatures are opaque `JsValue`s.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::engine::RarityEngine;
use crate::pity::PityState;
use crate::reroll::{RerollEngine, RerollStats};
use crate::stats::StatisticsAggregator;
use crate::tier::Rarity;
use crate::tuning::RollTuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("hatch-roll loaded");
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::warn!("Could not serialize binding result: {}", err);
        "null".to_string()
    })
}

fn pity_from(json: Option<String>) -> Option<PityState> {
    json.map(|j| PityState::from_json(&j))
}

fn stats_from(json: Option<String>) -> Option<RerollStats> {
    json.map(|j| RerollStats::from_json(&j))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RollJson<'a> {
    rarity: Rarity,
    was_pity: bool,
    pity_state: &'a PityState,
}

/// Rarity, reroll and stats engines for one player
#[wasm_bindgen]
pub struct HatchBindings {
    rarity: RarityEngine,
    reroll: RerollEngine<JsValue>,
    stats: StatisticsAggregator,
}

#[wasm_bindgen]
impl HatchBindings {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, tuning_json: Option<String>) -> HatchBindings {
        let tuning = tuning_json
            .map(|j| RollTuning::from_json(&j))
            .unwrap_or_default();
        let rarity = RarityEngine::new(seed as u64).with_tuning(tuning);
        log::info!("Hatch engines initialized with seed: {}", seed as u64);
        HatchBindings {
            reroll: rarity.reroll_engine(),
            stats: rarity.stats_aggregator(),
            rarity,
        }
    }

    /// Returns `{rarity, wasPity, pityState}` as JSON
    #[wasm_bindgen(js_name = rollRarity)]
    pub fn roll_rarity(&mut self, pity_json: Option<String>) -> String {
        let outcome = self.rarity.roll_rarity(pity_from(pity_json));
        to_json(&RollJson {
            rarity: outcome.rarity,
            was_pity: outcome.was_pity,
            pity_state: &outcome.pity,
        })
    }

    #[wasm_bindgen(js_name = generateColorForRarity)]
    pub fn generate_color_for_rarity(&mut self, rarity: &str) -> u32 {
        self.rarity.generate_color_for_id(rarity)
    }

    #[wasm_bindgen(js_name = shiftHue)]
    pub fn shift_hue(&self, base: u32, shift_degrees: f64) -> u32 {
        self.rarity.shift_hue(base, shift_degrees)
    }

    #[wasm_bindgen(js_name = rarityInfo)]
    pub fn rarity_info(&self, rarity: &str) -> String {
        to_json(self.rarity.rarity_info(rarity))
    }

    #[wasm_bindgen(js_name = startHatchSession)]
    pub fn start_hatch_session(&mut self, creature: JsValue) {
        self.reroll.start_hatch_session(creature);
    }

    #[wasm_bindgen(js_name = canReroll)]
    pub fn can_reroll(&self) -> bool {
        self.reroll.can_reroll()
    }

    #[wasm_bindgen(js_name = executeReroll)]
    pub fn execute_reroll(&mut self) -> bool {
        self.reroll.execute_reroll()
    }

    #[wasm_bindgen(js_name = setRerolledCreature)]
    pub fn set_rerolled_creature(&mut self, creature: JsValue) -> bool {
        self.reroll.set_rerolled_creature(creature)
    }

    /// `null` when no session is open
    #[wasm_bindgen(js_name = getFinalCreature)]
    pub fn final_creature(&self) -> JsValue {
        self.reroll.final_creature().cloned().unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = endHatchSession)]
    pub fn end_hatch_session(&mut self) {
        self.reroll.end_hatch_session();
    }

    /// Returns the updated reroll stats as JSON
    #[wasm_bindgen(js_name = trackReroll)]
    pub fn track_reroll(
        &self,
        original_rarity: &str,
        new_rarity: &str,
        stats_json: Option<String>,
    ) -> String {
        let mut stats = RerollStats::or_default(stats_from(stats_json), "trackReroll");
        self.reroll.track_reroll(
            Rarity::from_id_or_common(original_rarity),
            Rarity::from_id_or_common(new_rarity),
            &mut stats,
        );
        stats.to_json()
    }

    #[wasm_bindgen(js_name = getRerollAdvice)]
    pub fn reroll_advice(&self, rarity: &str) -> String {
        to_json(&self.reroll.reroll_advice(Rarity::from_id_or_common(rarity)))
    }

    #[wasm_bindgen(js_name = getPityProgress)]
    pub fn pity_progress(&self, pity_json: Option<String>) -> f64 {
        self.stats.pity_progress(pity_from(pity_json).as_ref())
    }

    #[wasm_bindgen(js_name = getPityProgressText)]
    pub fn pity_progress_text(&self, pity_json: Option<String>) -> String {
        self.stats.pity_progress_text(pity_from(pity_json).as_ref())
    }

    #[wasm_bindgen(js_name = calculateHatchStats)]
    pub fn calculate_hatch_stats(&self, pity_json: Option<String>) -> String {
        to_json(&self.stats.calculate_hatch_stats(pity_from(pity_json).as_ref()))
    }

    #[wasm_bindgen(js_name = calculateRerollStats)]
    pub fn calculate_reroll_stats(&self, stats_json: Option<String>) -> String {
        to_json(&self.stats.calculate_reroll_stats(stats_from(stats_json).as_ref()))
    }

    #[wasm_bindgen(js_name = formatRerollHistory)]
    pub fn format_reroll_history(&self, stats_json: Option<String>) -> String {
        self.stats.format_reroll_history(stats_from(stats_json).as_ref())
    }
}
