//! Learner-facing reporting helpers: ability percentages, knowledge bands,
//! and adaptive-testing efficiency.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};
use crate::model::{EfficiencyReport, KnowledgeLevel};

/// Abilities in `[-REPORTING_THETA_BOUND, REPORTING_THETA_BOUND]` span 0-100%.
pub const REPORTING_THETA_BOUND: f64 = 3.0;

/// Fixed-length test the adaptive session is compared against.
pub const DEFAULT_BASELINE_QUESTIONS: u32 = 15;

/// Average time a learner spends per question.
pub const DEFAULT_MINUTES_PER_QUESTION: u32 = 2;

/// Map ability onto a 0-100 scale.
///
/// `-3 -> 0`, `0 -> 50`, `3 -> 100`; values outside the range are clamped.
pub fn theta_to_percentage(theta: f64) -> f64 {
    if theta.is_nan() {
        return 0.0;
    }
    ((theta + REPORTING_THETA_BOUND) / (2.0 * REPORTING_THETA_BOUND) * 100.0).clamp(0.0, 100.0)
}

/// Qualitative knowledge band for an ability estimate.
pub fn describe_knowledge_level(theta: f64) -> KnowledgeLevel {
    if theta >= 2.0 {
        KnowledgeLevel::Expert
    } else if theta >= 1.0 {
        KnowledgeLevel::Advanced
    } else if theta >= 0.0 {
        KnowledgeLevel::Intermediate
    } else if theta >= -1.0 {
        KnowledgeLevel::Developing
    } else {
        KnowledgeLevel::Novice
    }
}

/// Efficiency accounting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub baseline_questions: u32,
    pub minutes_per_question: u32,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            baseline_questions: DEFAULT_BASELINE_QUESTIONS,
            minutes_per_question: DEFAULT_MINUTES_PER_QUESTION,
        }
    }
}

impl ReportingConfig {
    /// Efficiency of a session that asked `questions_asked` items.
    pub fn efficiency(&self, questions_asked: i64) -> Result<EfficiencyReport> {
        self.efficiency_against(questions_asked, i64::from(self.baseline_questions))
    }

    /// Same as [`efficiency`](Self::efficiency) with an explicit baseline.
    pub fn efficiency_against(
        &self,
        questions_asked: i64,
        baseline_questions: i64,
    ) -> Result<EfficiencyReport> {
        efficiency_gain_with_rate(questions_asked, baseline_questions, self.minutes_per_question)
    }
}

/// Questions and time saved against a fixed-length baseline.
///
/// Both counts must be positive. Asking more than the baseline saves
/// nothing; it never reports a negative saving.
pub fn calculate_efficiency_gain(
    questions_asked: i64,
    baseline_questions: i64,
) -> Result<EfficiencyReport> {
    efficiency_gain_with_rate(
        questions_asked,
        baseline_questions,
        DEFAULT_MINUTES_PER_QUESTION,
    )
}

fn efficiency_gain_with_rate(
    questions_asked: i64,
    baseline_questions: i64,
    minutes_per_question: u32,
) -> Result<EfficiencyReport> {
    let asked = positive_count("questions_asked", questions_asked)?;
    let baseline = positive_count("baseline_questions", baseline_questions)?;

    let questions_saved = baseline.saturating_sub(asked);
    let efficiency_score =
        (f64::from(questions_saved) / f64::from(baseline) * 100.0).round() as u32;
    let minutes = questions_saved.saturating_mul(minutes_per_question);

    Ok(EfficiencyReport {
        questions_asked: asked,
        baseline_questions: baseline,
        questions_saved,
        efficiency_score,
        time_saved: format_minutes(minutes),
    })
}

fn positive_count(field: &'static str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(InvalidInput::NonPositiveCount { field, value }.into());
    }
    u32::try_from(value).map_err(|_| InvalidInput::NonPositiveCount { field, value }.into())
}

/// Render a duration as "N minutes" or "H hours M minutes".
pub fn format_minutes(minutes: u32) -> String {
    let plural = |n: u32, unit: &str| {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };

    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => plural(m, "minute"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "minute")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn percentage_is_exactly_linear() {
        assert_eq!(theta_to_percentage(-3.0), 0.0);
        assert_eq!(theta_to_percentage(0.0), 50.0);
        assert_eq!(theta_to_percentage(3.0), 100.0);
        assert_eq!(theta_to_percentage(1.5), 75.0);
        assert_eq!(theta_to_percentage(-1.5), 25.0);
    }

    #[test]
    fn percentage_clamps_outside_range() {
        assert_eq!(theta_to_percentage(4.7), 100.0);
        assert_eq!(theta_to_percentage(-5.0), 0.0);
    }

    #[test]
    fn knowledge_bands() {
        assert_eq!(describe_knowledge_level(2.5), KnowledgeLevel::Expert);
        assert_eq!(describe_knowledge_level(2.0), KnowledgeLevel::Expert);
        assert_eq!(describe_knowledge_level(1.5), KnowledgeLevel::Advanced);
        assert_eq!(describe_knowledge_level(0.5), KnowledgeLevel::Intermediate);
        assert_eq!(describe_knowledge_level(0.0), KnowledgeLevel::Intermediate);
        assert_eq!(describe_knowledge_level(-0.5), KnowledgeLevel::Developing);
        assert_eq!(describe_knowledge_level(-1.0), KnowledgeLevel::Developing);
        assert_eq!(describe_knowledge_level(-2.0), KnowledgeLevel::Novice);
    }

    #[test]
    fn efficiency_against_baseline() {
        let report = calculate_efficiency_gain(3, 15).unwrap();
        assert_eq!(report.questions_saved, 12);
        assert_eq!(report.efficiency_score, 80);
        assert_eq!(report.time_saved, "24 minutes");

        let report = calculate_efficiency_gain(15, 15).unwrap();
        assert_eq!(report.questions_saved, 0);
        assert_eq!(report.efficiency_score, 0);
        assert_eq!(report.time_saved, "0 minutes");
    }

    #[test]
    fn efficiency_never_negative() {
        let report = calculate_efficiency_gain(20, 15).unwrap();
        assert_eq!(report.questions_saved, 0);
        assert_eq!(report.efficiency_score, 0);
    }

    #[test]
    fn efficiency_rejects_non_positive_counts() {
        for (asked, baseline) in [(0, 15), (-1, 15), (3, 0), (3, -10)] {
            let err = calculate_efficiency_gain(asked, baseline).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn configured_rate() {
        let config = ReportingConfig {
            baseline_questions: 40,
            minutes_per_question: 3,
        };
        let report = config.efficiency(10).unwrap();
        assert_eq!(report.questions_saved, 30);
        assert_eq!(report.efficiency_score, 75);
        assert_eq!(report.time_saved, "1 hour 30 minutes");

        let report = config.efficiency_against(10, 12).unwrap();
        assert_eq!(report.baseline_questions, 12);
        assert_eq!(report.time_saved, "6 minutes");
    }

    #[test]
    fn minute_formatting() {
        assert_eq!(format_minutes(1), "1 minute");
        assert_eq!(format_minutes(60), "1 hour");
        assert_eq!(format_minutes(125), "2 hours 5 minutes");
    }
}
