use std::path::Path;

pub fn run(scenario: &Path) -> Result<(), String> {
    let (mut state, reports) = super::run_scenario(Some(scenario))?;
    super::print_reports(&reports);

    let rejected = reports.iter().filter(|r| !r.is_applied()).count();
    if rejected > 0 {
        return Err(format!(
            "{rejected} of {} action{} rejected",
            reports.len(),
            if reports.len() == 1 { "" } else { "s" }
        ));
    }
    if state.recalculate_all().is_degenerate() {
        return Err("every spot is destroyed; no winner can be drawn".into());
    }

    println!("  All checks passed for '{}'.", scenario.display());
    println!(
        "  {} actions applied, turn {}",
        reports.len(),
        state.current_turn()
    );

    Ok(())
}
