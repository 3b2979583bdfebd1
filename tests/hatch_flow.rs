//! End-to-end hatch -> reroll -> summary flow, as the hatching scene drives it

use hatch_roll::{
    PityState, Rarity, RarityEngine, RarityTable, RarityTier, RerollEngine, RerollStats,
    ScriptedRng, StatisticsAggregator, color,
};

fn clock() -> f64 {
    1_000.0
}

#[derive(Debug, Clone, PartialEq)]
struct Egg {
    rarity: Rarity,
    color: u32,
}

#[test]
fn test_full_hatch_with_reroll() {
    // common roll, 3 color draws, then a legendary reroll
    let mut rng_draws = vec![0.1, 0.5, 0.5, 0.5];
    rng_draws.extend([0.99, 0.5, 0.5, 0.5]);
    let mut rarity = RarityEngine::with_rng(ScriptedRng::new(rng_draws)).with_clock(clock);
    let mut reroll: RerollEngine<Egg> = RerollEngine::new().with_clock(clock);
    let aggregator = StatisticsAggregator::default();

    let mut pity = PityState::default();
    let mut stats = RerollStats::default();

    let outcome = rarity.roll_rarity(Some(pity));
    pity = outcome.pity;
    assert_eq!(outcome.rarity, Rarity::Common);
    let first = Egg {
        rarity: outcome.rarity,
        color: rarity.generate_color_for_rarity(outcome.rarity),
    };

    assert!(!reroll.can_reroll());
    reroll.start_hatch_session(first.clone());
    assert!(reroll.reroll_advice(first.rarity).recommend);
    assert!(reroll.execute_reroll());
    assert!(!reroll.execute_reroll());

    let outcome = rarity.roll_rarity(Some(pity));
    pity = outcome.pity;
    assert_eq!(outcome.rarity, Rarity::Legendary);
    let second = Egg {
        rarity: outcome.rarity,
        color: rarity.generate_color_for_rarity(outcome.rarity),
    };
    let record = reroll.track_reroll(first.rarity, second.rarity, &mut stats);
    assert!(record.was_successful);
    assert_eq!(record.improvement, 4);
    assert!(reroll.set_rerolled_creature(second.clone()));

    assert_eq!(reroll.final_creature(), Some(&second));
    let kept = reroll.end_hatch_session().map(|s| s.into_final());
    assert_eq!(kept, Some(second));
    assert!(!reroll.can_reroll());

    assert_eq!(pity.total_hatches, 2);
    assert_eq!(pity.hatches_since_epic, 0);
    let hatch_stats = aggregator.calculate_hatch_stats(Some(&pity));
    assert_eq!(hatch_stats.window, 2);
    assert_eq!(hatch_stats.tier_rates[0].percent, 50.0);
    assert_eq!(hatch_stats.tier_rates[4].percent, 50.0);

    assert_eq!(
        aggregator.format_reroll_history(Some(&stats)),
        "⬆️ Common → Legendary (+4)"
    );
    let summary = aggregator.calculate_reroll_stats(Some(&stats));
    assert_eq!(summary.success_rate, 100.0);
    assert_eq!(summary.best_reroll, Some(record));
}

#[test]
fn test_state_survives_json_round_trip() {
    let mut rarity = RarityEngine::new(77).with_clock(clock);
    let reroll: RerollEngine<()> = RerollEngine::new().with_clock(clock);
    let mut pity = PityState::default();
    let mut stats = RerollStats::default();

    for _ in 0..45 {
        let a = rarity.roll_into(&mut pity).rarity;
        let b = rarity.roll_into(&mut pity).rarity;
        reroll.track_reroll(a, b, &mut stats);
    }

    let pity_back = PityState::from_json(&pity.to_json());
    let stats_back = RerollStats::from_json(&stats.to_json());
    assert_eq!(pity_back, pity);
    assert_eq!(stats_back, stats);
    assert_eq!(pity_back.history.len(), 20);
    assert_eq!(stats_back.reroll_history.len(), 20);

    // Keep rolling from the reloaded state
    let before = pity_back.total_hatches;
    let outcome = rarity.roll_rarity(Some(pity_back));
    assert_eq!(outcome.pity.total_hatches, before + 1);
    assert_eq!(outcome.pity.history.len(), 20);
}

#[test]
fn test_missing_state_never_panics() {
    let mut rarity = RarityEngine::new(3);
    let aggregator = StatisticsAggregator::default();
    let reroll: RerollEngine<()> = RerollEngine::new();

    let outcome = rarity.roll_rarity(None);
    assert_eq!(outcome.pity.total_hatches, 1);
    assert_eq!(aggregator.pity_progress(None), 0.0);
    assert!(!aggregator.pity_progress_text(None).is_empty());
    assert_eq!(aggregator.calculate_hatch_stats(None).window, 0);
    assert_eq!(aggregator.calculate_reroll_stats(None).window, 0);
    for r in Rarity::ALL {
        assert!(!reroll.reroll_advice(r).message.is_empty());
    }
    assert!(rarity.generate_color_for_id("???") <= 0xFFFFFF);
}

#[test]
fn test_accents_from_tier_color() {
    let mut rarity = RarityEngine::new(11);
    let base = rarity.generate_color_for_rarity(Rarity::Epic);
    let palette = color::accent_palette(base, 3, 30.0);
    assert_eq!(palette.len(), 4);
    assert_eq!(palette[0], base);
    assert_eq!(palette[1], rarity.shift_hue(base, 30.0));
    assert!(palette.iter().all(|&c| c <= 0xFFFFFF));
}

#[test]
fn test_custom_table_shared_by_all_engines() {
    let tiers: Vec<RarityTier> = RarityTable::standard()
        .iter()
        .filter(|t| t.rarity != Rarity::Legendary)
        .zip([60, 20, 12, 8])
        .map(|(tier, weight)| RarityTier {
            weight,
            ..tier.clone()
        })
        .collect();
    let table = RarityTable::new(tiers).unwrap();

    let mut rarity = RarityEngine::with_rng(ScriptedRng::new([0.95]))
        .with_table(table)
        .with_clock(clock);
    let reroll: RerollEngine<Egg> = rarity.reroll_engine();
    let aggregator = rarity.stats_aggregator();

    assert_eq!(
        reroll.reroll_advice(Rarity::Common).odds,
        "40% chance of a better tier"
    );
    assert_eq!(
        reroll.reroll_advice(Rarity::Epic).odds,
        "0% chance of a better tier"
    );

    let mut pity = PityState::default();
    assert_eq!(rarity.roll_into(&mut pity).rarity, Rarity::Epic);
    let hatch_stats = aggregator.calculate_hatch_stats(Some(&pity));
    assert_eq!(hatch_stats.tier_rates.len(), 4);
    assert!(hatch_stats.tier_rates.iter().all(|t| t.rarity != Rarity::Legendary));
    assert_eq!(
        hatch_stats
            .tier_rates
            .iter()
            .find(|t| t.rarity == Rarity::Epic)
            .map(|t| t.percent),
        Some(100.0)
    );
}
