//! Aggregate statistics across adaptive sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::results::SessionRecord;

/// Aggregate statistics for a batch of sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of completed sessions.
    pub session_count: usize,
    /// Average number of questions asked per session.
    pub mean_questions_asked: f64,
    /// Average efficiency score (0-100).
    pub mean_efficiency_score: f64,
    /// Fraction of sessions whose final estimate converged.
    pub convergence_rate: f64,
    /// Fraction of sessions that met the stopping rule.
    pub stopped_early_rate: f64,
    /// Session count per knowledge level.
    pub level_distribution: BTreeMap<String, usize>,
    /// Mean |theta_hat - theta| over sessions with a known true ability.
    #[serde(default)]
    pub mean_absolute_error: Option<f64>,
}

/// Compute aggregate statistics from session records.
pub fn compute_aggregate_stats(records: &[SessionRecord]) -> AggregateStats {
    if records.is_empty() {
        return AggregateStats::default();
    }

    let n = records.len() as f64;

    let mean_questions_asked = records
        .iter()
        .map(|r| f64::from(r.summary.questions_asked))
        .sum::<f64>()
        / n;

    let mean_efficiency_score = records
        .iter()
        .map(|r| f64::from(r.summary.efficiency.efficiency_score))
        .sum::<f64>()
        / n;

    let convergence_rate = records
        .iter()
        .filter(|r| r.summary.estimate.converged)
        .count() as f64
        / n;

    let stopped_early_rate = records.iter().filter(|r| r.summary.stopped_early).count() as f64 / n;

    let mut level_distribution = BTreeMap::new();
    for r in records {
        *level_distribution
            .entry(r.summary.knowledge_level.to_string())
            .or_insert(0) += 1;
    }

    let errors: Vec<f64> = records.iter().filter_map(|r| r.absolute_error()).collect();
    let mean_absolute_error = if errors.is_empty() {
        None
    } else {
        Some(errors.iter().sum::<f64>() / errors.len() as f64)
    };

    AggregateStats {
        session_count: records.len(),
        mean_questions_asked,
        mean_efficiency_score,
        convergence_rate,
        stopped_early_rate,
        level_distribution,
        mean_absolute_error,
    }
}
