pub mod check;
pub mod show;
pub mod simulate;
pub mod table;

use std::path::Path;

use colored::Colorize;
use pw_engine::{ActionReport, GameState, Scenario, SpotColor};
use tracing::debug;

/// Load a scenario file, or an empty scenario when no path is given.
fn load_scenario(path: Option<&Path>) -> Result<Scenario, String> {
    match path {
        Some(path) => Scenario::from_path(path).map_err(|e| e.to_string()),
        None => Ok(Scenario::default()),
    }
}

/// Load and run a scenario against a fresh game.
fn run_scenario(path: Option<&Path>) -> Result<(GameState, Vec<ActionReport>), String> {
    let (state, reports) = load_scenario(path)?.run().map_err(|e| e.to_string())?;
    debug!(
        scenario = ?path,
        actions = reports.len(),
        rejected = reports.iter().filter(|r| !r.is_applied()).count(),
        "scenario applied"
    );
    Ok((state, reports))
}

/// Print one line per action report.
fn print_reports(reports: &[ActionReport]) {
    if reports.is_empty() {
        return;
    }
    println!("  {}", "Actions".bold().underline());
    for report in reports {
        let index = format!("[{:>2}]", report.index).dimmed();
        match &report.error {
            None => println!("  {index} {}  {}", "ok".green().bold(), report.description),
            Some(err) => println!(
                "  {index} {}  {}  {}",
                "rejected".red().bold(),
                report.description,
                err.to_string().dimmed()
            ),
        }
    }
    println!();
}

fn color_label(color: SpotColor) -> colored::ColoredString {
    match color {
        SpotColor::Red => "red".red(),
        SpotColor::Black => "black".normal(),
    }
}
