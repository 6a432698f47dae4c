use comfy_table::{ContentArrangement, Table};
use pw_engine::SpotTable;

pub fn run() -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Spot", "Number", "Color", "Parity", "Range", "Dozen", "Column", "Payout",
    ]);

    let entries = SpotTable::standard().entries();
    for entry in entries {
        table.add_row(vec![
            entry.id.to_string(),
            entry.number().to_string(),
            super::color_label(entry.color).to_string(),
            if entry.is_odd { "odd" } else { "even" }.to_string(),
            if entry.is_high { "high" } else { "low" }.to_string(),
            entry.dozen.to_string(),
            entry.column.to_string(),
            format!("x{}", entry.base_payout),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} spots", entries.len());

    Ok(())
}
