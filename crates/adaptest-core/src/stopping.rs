//! Early-termination rule for adaptive sessions.
//!
//! A session stops once enough questions have been asked *and* the ability
//! estimate is precise enough. Both conditions must hold.

use serde::{Deserialize, Serialize};

use crate::model::StoppingDecision;

/// Inclusive floor on questions before a session may stop.
pub const DEFAULT_MIN_QUESTIONS: u32 = 3;

/// Exclusive ceiling on the confidence interval, in percentage points.
pub const DEFAULT_MAX_CONFIDENCE_INTERVAL: f64 = 10.0;

/// Stopping thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingRule {
    /// Minimum questions asked (inclusive).
    pub min_questions: u32,
    /// The interval must be strictly below this to stop.
    pub max_confidence_interval: f64,
    /// Optional hard cap. Reaching it stops the session regardless of
    /// precision. Unset by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<u32>,
}

impl Default for StoppingRule {
    fn default() -> Self {
        Self {
            min_questions: DEFAULT_MIN_QUESTIONS,
            max_confidence_interval: DEFAULT_MAX_CONFIDENCE_INTERVAL,
            max_questions: None,
        }
    }
}

impl StoppingRule {
    pub fn evaluate(&self, confidence_interval: f64, questions_asked: u32) -> StoppingDecision {
        let minimum_questions_reached = questions_asked >= self.min_questions;

        if let Some(cap) = self.max_questions {
            if minimum_questions_reached && questions_asked >= cap {
                return StoppingDecision {
                    should_stop: true,
                    minimum_questions_reached,
                    reason: format!(
                        "Maximum of {cap} questions reached (confidence interval ±{confidence_interval:.1}%)"
                    ),
                };
            }
        }

        if !minimum_questions_reached {
            return StoppingDecision {
                should_stop: false,
                minimum_questions_reached,
                reason: format!(
                    "Minimum of {} questions required ({} asked so far)",
                    self.min_questions, questions_asked
                ),
            };
        }

        // NaN never satisfies `<`, so an undefined interval keeps testing.
        if confidence_interval < self.max_confidence_interval {
            StoppingDecision {
                should_stop: true,
                minimum_questions_reached,
                reason: format!(
                    "Assessment complete: confidence interval ±{confidence_interval:.1}% is within the ±{:.1}% target",
                    self.max_confidence_interval
                ),
            }
        } else {
            StoppingDecision {
                should_stop: false,
                minimum_questions_reached,
                reason: format!(
                    "Confidence interval ±{confidence_interval:.1}% is wider than the ±{:.1}% target",
                    self.max_confidence_interval
                ),
            }
        }
    }
}

/// Evaluate the default stopping rule (at least 3 questions, interval < 10).
pub fn should_terminate_early(confidence_interval: f64, questions_asked: u32) -> StoppingDecision {
    StoppingRule::default().evaluate(confidence_interval, questions_asked)
}
