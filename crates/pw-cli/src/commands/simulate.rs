use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use pw_engine::Bet;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

pub fn run(
    scenario: Option<&Path>,
    spins: u32,
    seed: Option<u64>,
    bet_args: &[String],
) -> Result<(), String> {
    let bets = bet_args
        .iter()
        .map(|arg| arg.parse::<Bet>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let (mut state, reports) = super::run_scenario(scenario)?;
    super::print_reports(&reports);

    let seed = seed.unwrap_or(state.config().seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = state.recalculate_all();
    if distribution.is_degenerate() {
        return Err("every spot is destroyed; no winner can be drawn".into());
    }

    let mut wins: BTreeMap<u8, u32> = BTreeMap::new();
    let mut total_stake = 0u64;
    let mut total_payout = 0.0;
    for _ in 0..spins {
        let outcome = state.spin(&mut rng, &bets).map_err(|e| e.to_string())?;
        *wins.entry(outcome.winning_number).or_insert(0) += 1;
        total_stake += outcome.settlement.total_stake;
        total_payout += outcome.payout;
    }
    debug!(spins, seed, total_stake, total_payout, "simulation finished");

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({spins} spins, seed={seed})").dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Number", "Holders", "Expected", "Observed", "Delta"]);

    for (&number, &expected) in distribution.numbers() {
        let count = wins.get(&number).copied().unwrap_or(0);
        let observed = if spins == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(spins)
        };
        let holders: Vec<String> = distribution
            .holders(number)
            .iter()
            .map(ToString::to_string)
            .collect();
        table.add_row(vec![
            number.to_string(),
            holders.join(" "),
            format!("{expected:.4}"),
            format!("{observed:.4}"),
            format!("{:+.4}", observed - expected),
        ]);
    }

    println!("{table}");
    println!();

    if !bets.is_empty() {
        println!("  {}", "Bets".bold().underline());
        for bet in &bets {
            println!("  {bet}");
        }
        let ratio = if total_stake == 0 {
            0.0
        } else {
            total_payout / total_stake as f64
        };
        println!(
            "  Staked {total_stake}, returned {total_payout:.2} ({})",
            format!("{:.1}%", ratio * 100.0).bold()
        );
    }

    Ok(())
}
