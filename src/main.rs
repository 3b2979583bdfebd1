//! Hatch Roll entry point
//!
//! On the web the library is loaded directly (see `wasm::HatchBindings`).
//! Natively this runs a seeded hatch simulation and prints the summaries.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let hatches: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(200);
    let seed: u64 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or_else(|| hatch_roll::timestamp_ms() as u64);

    log::info!("Hatch Roll (native) simulating {} hatches, seed {}", hatches, seed);
    simulate(hatches, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm::start, this is just to satisfy the compiler
}

/// A hatched creature as the demo tracks it
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
struct Hatchling {
    rarity: hatch_roll::Rarity,
    color: u32,
}

/// Hatch `hatches` eggs, rerolling whenever the advice recommends it
#[cfg(not(target_arch = "wasm32"))]
fn simulate(hatches: u32, seed: u64) {
    use hatch_roll::color::to_css;
    use hatch_roll::{PityState, RarityEngine, RerollEngine, RerollStats};

    let mut rarity = RarityEngine::new(seed);
    let mut reroll: RerollEngine<Hatchling> = rarity.reroll_engine();
    let aggregator = rarity.stats_aggregator();
    let mut pity = PityState::default();
    let mut stats = RerollStats::default();

    fn hatch(engine: &mut RarityEngine, pity: &mut PityState) -> Hatchling {
        let rarity = engine.roll_into(pity).rarity;
        Hatchling {
            rarity,
            color: engine.generate_color_for_rarity(rarity),
        }
    }

    for _ in 0..hatches {
        let first = hatch(&mut rarity, &mut pity);
        let advice = reroll.reroll_advice(first.rarity);
        reroll.start_hatch_session(first.clone());

        if advice.recommend && reroll.execute_reroll() {
            let second = hatch(&mut rarity, &mut pity);
            reroll.track_reroll(first.rarity, second.rarity, &mut stats);
            reroll.set_rerolled_creature(second);
        }

        if let Some(kept) = reroll.end_hatch_session().map(|s| s.into_final()) {
            log::debug!("Kept {} ({})", kept.rarity, to_css(kept.color));
        }
    }

    let hatch_stats = aggregator.calculate_hatch_stats(Some(&pity));
    println!("Hatches: {} (pity rolls: {})", pity.total_hatches, pity.pities_triggered);
    println!("Last {} hatches:", hatch_stats.window);
    for rate in &hatch_stats.tier_rates {
        println!("  {:<10} {:>5.1}%", rate.rarity, rate.percent);
    }
    println!("{}", aggregator.pity_progress_text(Some(&pity)));

    let summary = aggregator.calculate_reroll_stats(Some(&stats));
    println!(
        "Rerolls: {} total, {} improved (last {}: {:.1}% success, avg {:+.2})",
        summary.total_rerolls,
        summary.successful_rerolls,
        summary.window,
        summary.success_rate,
        summary.average_improvement
    );
    println!("{}", aggregator.format_reroll_history(Some(&stats)));
}
