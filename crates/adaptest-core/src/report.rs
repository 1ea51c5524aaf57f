//! Assessment report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::SessionRecord;
use crate::statistics::AggregateStats;

/// A complete assessment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the item bank.
    pub bank: BankSummary,
    /// Individual session records.
    pub sessions: Vec<SessionRecord>,
    /// Aggregate statistics.
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an item bank (without the items themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
}

impl AssessmentReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let agg = &self.aggregate;

        md.push_str(&format!(
            "## {} ({} items)\n\n",
            self.bank.name, self.bank.item_count
        ));
        md.push_str(&format!(
            "**Summary:** {} sessions, {:.1} questions on average, {:.0}% mean efficiency, {:.0}% converged\n\n",
            agg.session_count,
            agg.mean_questions_asked,
            agg.mean_efficiency_score,
            agg.convergence_rate * 100.0
        ));
        if let Some(mae) = agg.mean_absolute_error {
            md.push_str(&format!("**Mean absolute error:** {mae:.3} logits\n\n"));
        }

        if !self.sessions.is_empty() {
            md.push_str("| Examinee | Questions | Theta | Score | Level | CI | Stopped |\n");
            md.push_str("|----------|-----------|-------|-------|-------|----|---------|\n");
            for s in &self.sessions {
                let summary = &s.summary;
                md.push_str(&format!(
                    "| {} | {} | {:+.2} | {:.1}% | {} | ±{:.1} | {} |\n",
                    s.examinee_id,
                    summary.questions_asked,
                    summary.estimate.theta,
                    summary.percentage,
                    summary.knowledge_level,
                    summary.estimate.confidence_interval,
                    if summary.stopped_early { "yes" } else { "no" }
                ));
            }
        }

        md
    }
}
