//! Core data model types for adaptest.
//!
//! These are the value types that flow between the estimator, the stopping
//! rule, the item analyzer and the reporting helpers. All of them are plain
//! immutable data; the engine keeps no state between calls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One answered item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Calibrated item difficulty on the 0-100 scale.
    #[serde(alias = "itemDifficulty")]
    pub item_difficulty: f64,
    /// Whether the learner answered correctly.
    pub correct: bool,
}

impl Response {
    pub fn new(item_difficulty: f64, correct: bool) -> Self {
        Self {
            item_difficulty,
            correct,
        }
    }

    pub fn correct(item_difficulty: f64) -> Self {
        Self::new(item_difficulty, true)
    }

    pub fn incorrect(item_difficulty: f64) -> Self {
        Self::new(item_difficulty, false)
    }
}

/// Result of fitting latent ability to a response history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityEstimate {
    /// Point estimate on the logit scale, clamped to the operating range.
    pub theta: f64,
    /// Standard error of `theta`, from the test information at the estimate.
    pub standard_error: f64,
    /// 95% half-width in percentage points (see [`crate::estimator`]).
    pub confidence_interval: f64,
    /// Whether the update magnitude fell below tolerance within budget.
    pub converged: bool,
    /// Newton-Raphson iterations performed (1..=10).
    pub iterations: u32,
}

/// Verdict of the stopping rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoppingDecision {
    pub should_stop: bool,
    pub minimum_questions_reached: bool,
    /// Human-readable explanation of the decision.
    pub reason: String,
}

/// Discrimination statistics for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscriminationResult {
    /// Top-group correct rate minus bottom-group correct rate, in [-1, 1].
    pub discrimination_index: f64,
    pub top_group_correct_rate: f64,
    pub bottom_group_correct_rate: f64,
    /// Combined size of both groups.
    pub sample_size: usize,
    /// True once `sample_size` reaches the minimum for a meaningful index.
    pub is_statistically_valid: bool,
}

/// Questions and time saved by stopping early against a fixed-length test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub questions_asked: u32,
    pub baseline_questions: u32,
    pub questions_saved: u32,
    /// Percentage of the baseline that was skipped, 0-100.
    pub efficiency_score: u32,
    /// Time saved as a human string, e.g. "24 minutes".
    pub time_saved: String,
}

/// Qualitative knowledge bands derived from ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    Novice,
    Developing,
    Intermediate,
    Advanced,
    Expert,
}

impl KnowledgeLevel {
    pub const ALL: [KnowledgeLevel; 5] = [
        KnowledgeLevel::Novice,
        KnowledgeLevel::Developing,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Advanced,
        KnowledgeLevel::Expert,
    ];
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeLevel::Novice => write!(f, "Novice"),
            KnowledgeLevel::Developing => write!(f, "Developing"),
            KnowledgeLevel::Intermediate => write!(f, "Intermediate"),
            KnowledgeLevel::Advanced => write!(f, "Advanced"),
            KnowledgeLevel::Expert => write!(f, "Expert"),
        }
    }
}

impl FromStr for KnowledgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "novice" => Ok(KnowledgeLevel::Novice),
            "developing" => Ok(KnowledgeLevel::Developing),
            "intermediate" => Ok(KnowledgeLevel::Intermediate),
            "advanced" => Ok(KnowledgeLevel::Advanced),
            "expert" => Ok(KnowledgeLevel::Expert),
            other => Err(format!("unknown knowledge level: {other}")),
        }
    }
}

/// Qualitative bands for a discrimination index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscriminationQuality {
    Excellent,
    Good,
    Acceptable,
    Marginal,
    Poor,
}

impl DiscriminationQuality {
    /// Poor items should be pulled for review before they are served again.
    pub fn needs_review(&self) -> bool {
        matches!(self, DiscriminationQuality::Poor)
    }

    /// Longer description suitable for an item audit report.
    pub fn description(&self) -> &'static str {
        match self {
            DiscriminationQuality::Excellent => "Excellent - strongly separates high and low performers",
            DiscriminationQuality::Good => "Good - separates high and low performers",
            DiscriminationQuality::Acceptable => "Acceptable - usable, could be improved",
            DiscriminationQuality::Marginal => "Marginal - consider revising",
            DiscriminationQuality::Poor => "Poor - flag for review",
        }
    }
}

impl fmt::Display for DiscriminationQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscriminationQuality::Excellent => write!(f, "Excellent"),
            DiscriminationQuality::Good => write!(f, "Good"),
            DiscriminationQuality::Acceptable => write!(f, "Acceptable"),
            DiscriminationQuality::Marginal => write!(f, "Marginal"),
            DiscriminationQuality::Poor => write!(f, "Poor"),
        }
    }
}

/// A calibrated question in an item bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier within the bank.
    pub id: String,
    /// Question text, if the bank carries it.
    #[serde(default)]
    pub prompt: String,
    /// Calibrated difficulty on the 0-100 scale.
    pub difficulty: f64,
    /// Optional topic tag (e.g. "cardiology").
    #[serde(default)]
    pub topic: Option<String>,
}

/// A collection of calibrated items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<Item>,
}
