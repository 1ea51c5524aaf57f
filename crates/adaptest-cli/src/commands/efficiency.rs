//! The `adaptest efficiency` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptest_core::config::load_config_from;

pub fn execute(asked: i64, baseline: Option<i64>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let baseline = baseline.unwrap_or(i64::from(config.reporting.baseline_questions));
    let report = config.reporting.efficiency_against(asked, baseline)?;

    println!(
        "Questions asked: {} (baseline {})",
        report.questions_asked, report.baseline_questions
    );
    println!("Questions saved: {}", report.questions_saved);
    println!("Efficiency: {}%", report.efficiency_score);
    println!("Time saved: {}", report.time_saved);

    Ok(())
}
