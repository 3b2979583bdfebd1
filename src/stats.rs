//! Progress text and aggregate rates for the hatch summary panel
//!
//! Rates are computed over the bounded history window only; lifetime
//! counters are passed through untouched so both can be shown.

use serde::Serialize;

use crate::pity::PityState;
use crate::reroll::{RerollRecord, RerollStats};
use crate::tier::{Rarity, RarityTable};
use crate::tuning::RollTuning;

/// Share of the window that landed on one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRate {
    pub rarity: Rarity,
    pub count: u32,
    /// 0-100
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HatchStats {
    /// Hatches in the history window
    pub window: usize,
    /// One entry per tier, lowest first
    pub tier_rates: Vec<TierRate>,
    /// Percent of windowed hatches decided by pity
    pub pity_rate: f64,
    pub total_hatches: u32,
    pub pities_triggered: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollSummary {
    /// Rerolls in the history window
    pub window: usize,
    /// Percent of windowed rerolls that improved the tier
    pub success_rate: f64,
    pub average_improvement: f64,
    /// Largest improvement in the window (earliest wins ties)
    pub best_reroll: Option<RerollRecord>,
    pub total_rerolls: u32,
    pub successful_rerolls: u32,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Pass the state through, logging when the caller had none to give
fn warn_if_missing<T>(state: Option<T>, context: &str) -> Option<T> {
    if state.is_none() {
        log::warn!("{}: no state supplied, using defaults", context);
    }
    state
}

/// Derives display strings and rates from pity and reroll state
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    table: RarityTable,
    tuning: RollTuning,
}

impl StatisticsAggregator {
    pub fn new(table: RarityTable, tuning: RollTuning) -> Self {
        Self {
            table,
            tuning: tuning.sanitized(),
        }
    }

    /// Progress toward the pity roll, 0-100
    pub fn pity_progress(&self, pity: Option<&PityState>) -> f64 {
        let pity = warn_if_missing(pity, "pity_progress");
        let hatches = pity.map(|p| p.hatches_since_epic).unwrap_or(0);
        (hatches as f64 * 100.0 / self.tuning.pity_threshold as f64).min(100.0)
    }

    pub fn pity_progress_text(&self, pity: Option<&PityState>) -> String {
        let pity = warn_if_missing(pity, "pity_progress_text");
        let hatches = pity.map(|p| p.hatches_since_epic).unwrap_or(0);
        let threshold = self.tuning.pity_threshold;
        if hatches >= threshold || pity.is_some_and(|p| p.guaranteed_epic_next) {
            "Epic or better guaranteed on the next hatch!".to_string()
        } else {
            let remaining = threshold - hatches;
            format!(
                "{}/{} toward a guaranteed Epic ({} to go)",
                hatches, threshold, remaining
            )
        }
    }

    /// Per-tier and pity rates over the pity history window
    pub fn calculate_hatch_stats(&self, pity: Option<&PityState>) -> HatchStats {
        let Some(pity) = warn_if_missing(pity, "calculate_hatch_stats") else {
            return self.empty_hatch_stats(0, 0);
        };
        let window = pity.history.len();
        if window == 0 {
            return self.empty_hatch_stats(pity.total_hatches, pity.pities_triggered);
        }

        let tier_rates = self
            .table
            .iter()
            .map(|tier| {
                let count = pity.history.iter().filter(|h| h.rarity == tier.rarity).count();
                TierRate {
                    rarity: tier.rarity,
                    count: count as u32,
                    percent: percent(count, window),
                }
            })
            .collect();
        let pity_hatches = pity.history.iter().filter(|h| h.was_pity).count();

        HatchStats {
            window,
            tier_rates,
            pity_rate: percent(pity_hatches, window),
            total_hatches: pity.total_hatches,
            pities_triggered: pity.pities_triggered,
        }
    }

    fn empty_hatch_stats(&self, total_hatches: u32, pities_triggered: u32) -> HatchStats {
        HatchStats {
            window: 0,
            tier_rates: self
                .table
                .iter()
                .map(|tier| TierRate {
                    rarity: tier.rarity,
                    count: 0,
                    percent: 0.0,
                })
                .collect(),
            pity_rate: 0.0,
            total_hatches,
            pities_triggered,
        }
    }

    /// Success rate, average improvement and best reroll over the window
    pub fn calculate_reroll_stats(&self, stats: Option<&RerollStats>) -> RerollSummary {
        let stats = warn_if_missing(stats, "calculate_reroll_stats");
        let (total_rerolls, successful_rerolls) = stats
            .map(|s| (s.total_rerolls, s.successful_rerolls))
            .unwrap_or((0, 0));
        let history = stats.map(|s| &s.reroll_history);
        let window = history.map(|h| h.len()).unwrap_or(0);

        let mut summary = RerollSummary {
            window,
            success_rate: 0.0,
            average_improvement: 0.0,
            best_reroll: None,
            total_rerolls,
            successful_rerolls,
        };
        let Some(history) = history.filter(|h| !h.is_empty()) else {
            return summary;
        };

        let successes = history.iter().filter(|r| r.was_successful).count();
        let improvement_sum: i32 = history.iter().map(|r| r.improvement).sum();
        summary.success_rate = percent(successes, window);
        summary.average_improvement = improvement_sum as f64 / window as f64;
        summary.best_reroll = history
            .iter()
            .fold(None::<&RerollRecord>, |best, r| match best {
                Some(b) if b.improvement >= r.improvement => Some(b),
                _ => Some(r),
            })
            .cloned();
        summary
    }

    /// Most recent rerolls, newest first, one per line
    pub fn format_reroll_history(&self, stats: Option<&RerollStats>) -> String {
        let stats = warn_if_missing(stats, "format_reroll_history");
        let Some(stats) = stats.filter(|s| !s.reroll_history.is_empty()) else {
            return "No rerolls yet".to_string();
        };
        stats
            .reroll_history
            .recent(self.tuning.history_lines)
            .map(|r| {
                let arrow = match r.improvement {
                    i if i > 0 => "⬆️",
                    0 => "➡️",
                    _ => "⬇️",
                };
                format!(
                    "{} {} → {} ({:+})",
                    arrow,
                    self.table.tier(r.original_rarity).name,
                    self.table.tier(r.new_rarity).name,
                    r.improvement
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pity::HatchRecord;
    use crate::reroll::RerollEngine;

    fn aggregator() -> StatisticsAggregator {
        StatisticsAggregator::default()
    }

    fn clock() -> f64 {
        0.0
    }

    fn hatch(rarity: Rarity, was_pity: bool) -> HatchRecord {
        HatchRecord {
            rarity,
            timestamp: 0.0,
            was_pity,
        }
    }

    #[test]
    fn test_pity_progress() {
        let agg = aggregator();
        assert_eq!(agg.pity_progress(None), 0.0);
        let mut pity = PityState::default();
        pity.hatches_since_epic = 4;
        assert_eq!(agg.pity_progress(Some(&pity)), 40.0);
        pity.hatches_since_epic = 14;
        assert_eq!(agg.pity_progress(Some(&pity)), 100.0);
    }

    #[test]
    fn test_pity_progress_text() {
        let agg = aggregator();
        assert_eq!(
            agg.pity_progress_text(None),
            "0/10 toward a guaranteed Epic (10 to go)"
        );
        let mut pity = PityState::default();
        pity.hatches_since_epic = 7;
        assert_eq!(
            agg.pity_progress_text(Some(&pity)),
            "7/10 toward a guaranteed Epic (3 to go)"
        );
        pity.hatches_since_epic = 10;
        assert!(agg.pity_progress_text(Some(&pity)).contains("guaranteed on the next"));
    }

    #[test]
    fn test_hatch_stats_over_window() {
        let agg = aggregator();
        let mut pity = PityState::default();
        for _ in 0..6 {
            pity.history.append(hatch(Rarity::Common, false));
        }
        pity.history.append(hatch(Rarity::Rare, false));
        pity.history.append(hatch(Rarity::Epic, true));
        pity.total_hatches = 300;
        pity.pities_triggered = 9;

        let stats = agg.calculate_hatch_stats(Some(&pity));
        assert_eq!(stats.window, 8);
        assert_eq!(stats.tier_rates.len(), 5);
        assert_eq!(stats.tier_rates[0].count, 6);
        assert_eq!(stats.tier_rates[0].percent, 75.0);
        assert_eq!(stats.tier_rates[2].percent, 12.5);
        assert_eq!(stats.tier_rates[4].percent, 0.0);
        assert_eq!(stats.pity_rate, 12.5);
        assert_eq!(stats.total_hatches, 300);
        assert_eq!(stats.pities_triggered, 9);
    }

    #[test]
    fn test_empty_defaults() {
        let agg = aggregator();
        let hatch_stats = agg.calculate_hatch_stats(None);
        assert_eq!(hatch_stats.window, 0);
        assert!(hatch_stats.tier_rates.iter().all(|t| t.percent == 0.0));

        let reroll = agg.calculate_reroll_stats(None);
        assert_eq!(reroll.window, 0);
        assert_eq!(reroll.success_rate, 0.0);
        assert_eq!(reroll.average_improvement, 0.0);
        assert!(reroll.best_reroll.is_none());

        let reroll = agg.calculate_reroll_stats(Some(&RerollStats::default()));
        assert!(reroll.best_reroll.is_none());

        assert_eq!(agg.format_reroll_history(None), "No rerolls yet");
        assert_eq!(agg.pity_progress(None), 0.0);
        assert!(agg.pity_progress_text(None).starts_with("0/10"));
    }

    #[test]
    fn test_reroll_summary() {
        let agg = aggregator();
        let engine: RerollEngine<()> = RerollEngine::new().with_clock(clock);
        let mut stats = RerollStats::new();
        engine.track_reroll(Rarity::Common, Rarity::Rare, &mut stats); // +2
        engine.track_reroll(Rarity::Epic, Rarity::Common, &mut stats); // -3
        engine.track_reroll(Rarity::Common, Rarity::Epic, &mut stats); // +3
        engine.track_reroll(Rarity::Uncommon, Rarity::Legendary, &mut stats); // +3

        let summary = agg.calculate_reroll_stats(Some(&stats));
        assert_eq!(summary.window, 4);
        assert_eq!(summary.success_rate, 75.0);
        assert_eq!(summary.average_improvement, 1.25);
        let best = summary.best_reroll.unwrap();
        assert_eq!(best.improvement, 3);
        assert_eq!(best.original_rarity, Rarity::Common);
        assert_eq!(summary.total_rerolls, 4);
        assert_eq!(summary.successful_rerolls, 3);
    }

    #[test]
    fn test_format_history_newest_first() {
        let agg = aggregator();
        let engine: RerollEngine<()> = RerollEngine::new().with_clock(clock);
        let mut stats = RerollStats::new();
        for _ in 0..4 {
            engine.track_reroll(Rarity::Rare, Rarity::Rare, &mut stats);
        }
        engine.track_reroll(Rarity::Epic, Rarity::Common, &mut stats);
        engine.track_reroll(Rarity::Common, Rarity::Legendary, &mut stats);

        let text = agg.format_reroll_history(Some(&stats));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "⬆️ Common → Legendary (+4)");
        assert_eq!(lines[1], "⬇️ Epic → Common (-3)");
        assert_eq!(lines[2], "➡️ Rare → Rare (+0)");
    }
}
