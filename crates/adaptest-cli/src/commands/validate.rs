//! The `adaptest validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use adaptest_core::parser;

pub fn execute(bank_path: Option<PathBuf>, responses_path: Option<PathBuf>) -> Result<()> {
    if let Some(path) = responses_path {
        validate_responses(&path)?;
    }
    if let Some(path) = bank_path {
        validate_banks(&path)?;
    }
    Ok(())
}

fn validate_responses(path: &Path) -> Result<()> {
    let responses = parser::parse_session_file(path)?;
    let correct = responses.iter().filter(|r| r.correct).count();
    println!(
        "Response history: {} responses ({} correct)",
        responses.len(),
        correct
    );
    println!("All responses valid.");
    Ok(())
}

fn validate_banks(path: &Path) -> Result<()> {
    let banks = if path.is_dir() {
        parser::load_item_bank_directory(path)?
    } else {
        vec![parser::parse_item_bank(path)?]
    };

    let mut total_warnings = 0;

    for bank in &banks {
        println!("Item bank: {} ({} items)", bank.name, bank.items.len());

        let warnings = parser::validate_item_bank(bank);
        for w in &warnings {
            let prefix = w
                .item_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All item banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
