//! The `adaptest simulate` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use adaptest_core::config::load_config_from;
use adaptest_core::engine::{AssessmentEngine, ProgressReporter};
use adaptest_core::parser::{parse_item_bank, validate_item_bank};
use adaptest_core::report::AssessmentReport;
use adaptest_core::results::SessionRecord;
use adaptest_core::session::{Examinee, MaxInformationSelector, SessionStep, SimulatedExaminee};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_session_start(&self, examinee_id: &str) {
        eprintln!("  Starting: {examinee_id}");
    }

    fn on_item_answered(&self, examinee_id: &str, item_id: &str, step: &SessionStep) {
        tracing::debug!(
            examinee_id,
            item_id,
            question = step.question_number,
            theta = step.estimate.theta,
            ci = step.estimate.confidence_interval,
            "item answered"
        );
    }

    fn on_session_complete(&self, record: &SessionRecord) {
        let summary = &record.summary;
        eprintln!(
            "  Done: {} after {} items, theta {:+.2} ±{:.1}% ({})",
            record.examinee_id,
            summary.questions_asked,
            summary.estimate.theta,
            summary.estimate.confidence_interval,
            if summary.stopped_early {
                "precision reached"
            } else {
                "bank exhausted"
            }
        );
    }

    fn on_session_error(&self, examinee_id: &str, error: &str) {
        eprintln!("  ERROR: {examinee_id}: {error}");
    }

    fn on_run_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} sessions succeeded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    bank_path: PathBuf,
    abilities_str: String,
    parallelism: Option<usize>,
    output: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(p) = parallelism {
        anyhow::ensure!(p >= 1, "parallelism must be at least 1");
        config.parallelism = p;
    }

    let abilities: Vec<f64> = abilities_str
        .split(',')
        .map(|s| {
            let s = s.trim();
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| anyhow::anyhow!("invalid ability value: '{s}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    anyhow::ensure!(!abilities.is_empty(), "at least one ability is required");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    if let Some(bad) = formats.iter().find(|f| !matches!(**f, "json" | "markdown")) {
        anyhow::bail!("unknown format '{bad}', expected json, markdown or all");
    }

    let bank = parse_item_bank(&bank_path)?;
    for w in validate_item_bank(&bank) {
        tracing::warn!("{}: {}", bank.id, w.message);
    }

    let examinees: Vec<Arc<dyn Examinee>> = abilities
        .iter()
        .enumerate()
        .map(|(i, &theta)| {
            Arc::new(SimulatedExaminee::new(format!("examinee-{:02}", i + 1), theta))
                as Arc<dyn Examinee>
        })
        .collect();

    eprintln!(
        "adaptest v{} — Simulating {} sessions against '{}' ({} items)",
        env!("CARGO_PKG_VERSION"),
        examinees.len(),
        bank.name,
        bank.items.len()
    );
    eprintln!();

    let engine = AssessmentEngine::new(Arc::new(MaxInformationSelector), config.engine_config());
    let report = engine.run(&bank, &examinees, &ConsoleReporter).await?;

    print_summary(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())?;
                eprintln!("Markdown report: {}", path.display());
            }
            other => anyhow::bail!("unknown format '{other}'"),
        }
    }

    Ok(())
}

fn print_summary(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Examinee",
        "True theta",
        "Estimate",
        "CI",
        "Questions",
        "Level",
        "Efficiency",
    ]);

    for s in &report.sessions {
        let summary = &s.summary;
        table.add_row(vec![
            Cell::new(&s.examinee_id),
            Cell::new(
                s.true_theta
                    .map(|t| format!("{t:+.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format!("{:+.2}", summary.estimate.theta)),
            Cell::new(format!("±{:.1}", summary.estimate.confidence_interval)),
            Cell::new(summary.questions_asked),
            Cell::new(summary.knowledge_level),
            Cell::new(format!("{}%", summary.efficiency.efficiency_score)),
        ]);
    }

    println!("{table}");

    let agg = &report.aggregate;
    println!(
        "\n{} sessions, {:.1} questions on average, {:.0}% converged",
        agg.session_count,
        agg.mean_questions_asked,
        agg.convergence_rate * 100.0
    );
    if let Some(mae) = agg.mean_absolute_error {
        println!("Mean absolute error: {mae:.3} logits");
    }
}
