//! The `adaptest analyze` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::discrimination::{analyze_items, ItemAnalysis};
use adaptest_core::parser::parse_item_analysis_file;

pub fn execute(items_path: PathBuf, format: String) -> Result<()> {
    let items = parse_item_analysis_file(&items_path)?;
    let analyses = analyze_items(&items);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&analyses)?);
        }
        "text" => {
            print_table(&analyses);

            let flagged: Vec<&str> = analyses
                .iter()
                .filter(|a| a.needs_review())
                .map(|a| a.item_id.as_str())
                .collect();
            if flagged.is_empty() {
                println!("No items need review.");
            } else {
                println!(
                    "{} item(s) flagged for review: {}",
                    flagged.len(),
                    flagged.join(", ")
                );
            }
        }
        other => anyhow::bail!("unknown format '{other}', expected text or json"),
    }

    Ok(())
}

fn print_table(analyses: &[ItemAnalysis]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Item", "Index", "Top %", "Bottom %", "N", "Valid", "Quality",
    ]);

    for a in analyses {
        match (&a.result, &a.quality) {
            (Some(r), Some(q)) => {
                table.add_row(vec![
                    Cell::new(&a.item_id),
                    Cell::new(format!("{:+.2}", r.discrimination_index)),
                    Cell::new(format!("{:.1}%", r.top_group_correct_rate * 100.0)),
                    Cell::new(format!("{:.1}%", r.bottom_group_correct_rate * 100.0)),
                    Cell::new(r.sample_size),
                    Cell::new(if r.is_statistically_valid { "yes" } else { "no" }),
                    Cell::new(q.description()),
                ]);
            }
            _ => {
                table.add_row(vec![
                    Cell::new(&a.item_id),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(format!(
                        "Invalid data: {}",
                        a.error.as_deref().unwrap_or("unknown")
                    )),
                ]);
            }
        }
    }

    println!("{table}\n");
}
