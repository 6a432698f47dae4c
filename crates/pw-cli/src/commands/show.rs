use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

pub fn run(scenario: Option<&Path>, json: bool) -> Result<(), String> {
    let (state, reports) = super::run_scenario(scenario)?;
    let snapshot = state.snapshot();

    if json {
        let out = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("cannot serialize snapshot: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        "Turn".bold(),
        format!("{} ({} records applied)", snapshot.turn, record_count(&snapshot)).dimmed()
    );
    println!();
    super::print_reports(&reports);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Spot",
        "Number",
        "Color",
        "Status",
        "Probability",
        "Payout",
        "Records",
    ]);

    for spot in &snapshot.spots {
        let status = if spot.destroyed {
            "destroyed".red().to_string()
        } else {
            "active".green().to_string()
        };
        table.add_row(vec![
            spot.id.to_string(),
            spot.number.to_string(),
            super::color_label(spot.color).to_string(),
            status,
            format!("{:.4}", spot.probability),
            format!("x{:.2}", spot.payout_multiplier),
            spot.lineage.len().to_string(),
        ]);
    }

    println!("{table}");
    println!();

    let destroyed = snapshot.spots.iter().filter(|s| s.destroyed).count();
    println!(
        "  {} active, {} destroyed, probability sum {:.6}",
        snapshot.spots.len() - destroyed,
        destroyed,
        snapshot.total_probability()
    );

    Ok(())
}

fn record_count(snapshot: &pw_engine::TurnSnapshot) -> usize {
    snapshot.spots.iter().map(|s| s.lineage.len()).sum()
}
