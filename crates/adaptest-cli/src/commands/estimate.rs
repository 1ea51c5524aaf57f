//! The `adaptest estimate` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use adaptest_core::config::load_config_from;
use adaptest_core::parser::parse_session_file;
use adaptest_core::session::{AdaptiveSession, SessionStep, SessionSummary};

#[derive(Serialize)]
struct EstimateOutput {
    summary: SessionSummary,
    steps: Vec<SessionStep>,
}

pub fn execute(responses_path: PathBuf, format: String, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(
        format == "text" || format == "json",
        "unknown format '{format}', expected text or json"
    );

    let config = load_config_from(config_path.as_deref())?;
    let responses = parse_session_file(&responses_path)?;

    // A recorded history is replayed in full, even past the point where the
    // stopping rule would have ended the live session.
    let mut session = AdaptiveSession::new(config.session_config());
    let steps = responses
        .iter()
        .map(|&r| session.record(r))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let summary = session.summary()?;

    if format == "json" {
        let output = EstimateOutput { summary, steps };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_trajectory(&steps);
    print_summary(&summary);
    Ok(())
}

fn print_trajectory(steps: &[SessionStep]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Theta", "SE", "CI", "Score", "Level"]);

    for step in steps {
        table.add_row(vec![
            Cell::new(step.question_number),
            Cell::new(format!("{:+.2}", step.estimate.theta)),
            Cell::new(format!("{:.2}", step.estimate.standard_error)),
            Cell::new(format!("±{:.1}", step.estimate.confidence_interval)),
            Cell::new(format!("{:.1}%", step.percentage)),
            Cell::new(step.knowledge_level),
        ]);
    }

    println!("{table}\n");
}

fn print_summary(summary: &SessionSummary) {
    let est = &summary.estimate;
    let eff = &summary.efficiency;

    println!("Responses: {}", summary.questions_asked);
    println!("Ability (theta): {:+.3}", est.theta);
    println!("Standard error: {:.3}", est.standard_error);
    println!("Confidence interval: ±{:.1}%", est.confidence_interval);
    println!(
        "Converged: {} ({} iterations)",
        if est.converged { "yes" } else { "no" },
        est.iterations
    );
    println!("Score: {:.1}%", summary.percentage);
    println!("Knowledge level: {}", summary.knowledge_level);
    println!(
        "Decision: {} - {}",
        if summary.stopped_early { "stop" } else { "continue" },
        summary.reason
    );
    println!(
        "Efficiency: {} of {} questions, {} saved ({}%), {} saved",
        eff.questions_asked,
        eff.baseline_questions,
        eff.questions_saved,
        eff.efficiency_score,
        eff.time_saved
    );
}
