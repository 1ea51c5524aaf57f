//! Maximum-likelihood ability estimation under the Rasch model.
//!
//! The estimator is a bounded Newton-Raphson solve on the log-likelihood:
//!
//! ```text
//! S(theta) = sum(u_i - P_i)          (score)
//! I(theta) = sum(P_i * (1 - P_i))    (information)
//! theta'   = clamp(theta + S / I)
//! ```
//!
//! Divergence on all-correct or all-incorrect histories is contained by three
//! guards: a hard iteration cap, an information floor that halts iteration
//! instead of dividing by a vanishing curvature, and clamping theta to the
//! operating range after every update.
//!
//! Confidence intervals are reported as a 95% half-width in percentage points:
//! `z * SE * interval_points_per_logit`. The default of 6.25 points per logit
//! lets a well-targeted session reach the ±10 stopping threshold in about
//! nine items.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::irt::{difficulty_to_logit, probability};
use crate::model::{AbilityEstimate, Response};
use crate::validation::validate_responses;

/// Hard upper limit on Newton-Raphson iterations.
pub const MAX_ITERATIONS: u32 = 10;

/// Widest reportable confidence interval, in percentage points.
pub const CONFIDENCE_INTERVAL_CAP: f64 = 100.0;

/// Percentage points per logit of standard error in the reported interval.
pub const DEFAULT_INTERVAL_POINTS_PER_LOGIT: f64 = 6.25;

/// Tuning knobs for the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Newton-Raphson iteration cap, 1..=10.
    pub max_iterations: u32,
    /// Convergence threshold on the absolute theta update.
    pub tolerance: f64,
    /// Theta is clamped to `[-theta_bound, theta_bound]`.
    pub theta_bound: f64,
    /// Information below this is treated as zero.
    pub min_information: f64,
    /// Critical value for the reported interval (1.96 for 95%).
    pub confidence_z: f64,
    /// Converts `z * SE` (logits) into interval points.
    pub interval_points_per_logit: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: 1e-3,
            theta_bound: 5.0,
            min_information: 1e-6,
            confidence_z: 1.96,
            interval_points_per_logit: DEFAULT_INTERVAL_POINTS_PER_LOGIT,
        }
    }
}

/// Stateless ability estimator. Cheap to construct, safe to share.
#[derive(Debug, Clone, Default)]
pub struct AbilityEstimator {
    config: EstimatorConfig,
}

impl AbilityEstimator {
    /// Build an estimator. Non-positive or non-finite bounds and scales fall
    /// back to their defaults so `estimate` never clamps to an empty range.
    pub fn new(mut config: EstimatorConfig) -> Self {
        let defaults = EstimatorConfig::default();
        if !(config.theta_bound.is_finite() && config.theta_bound > 0.0) {
            tracing::warn!(theta_bound = config.theta_bound, "invalid theta bound, using default");
            config.theta_bound = defaults.theta_bound;
        }
        if !(config.confidence_z.is_finite() && config.confidence_z > 0.0) {
            config.confidence_z = defaults.confidence_z;
        }
        if !(config.interval_points_per_logit.is_finite() && config.interval_points_per_logit > 0.0)
        {
            config.interval_points_per_logit = defaults.interval_points_per_logit;
        }
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Fit theta to a full response history.
    ///
    /// Fails only on invalid input. Running out of iterations is reported as
    /// `converged: false` with the best estimate reached.
    pub fn estimate(&self, responses: &[Response]) -> Result<AbilityEstimate> {
        validate_responses(responses)?;

        let items: Vec<(f64, f64)> = responses
            .iter()
            .map(|r| {
                (
                    difficulty_to_logit(r.item_difficulty),
                    if r.correct { 1.0 } else { 0.0 },
                )
            })
            .collect();

        let bound = self.config.theta_bound;
        let max_iterations = self.config.max_iterations.clamp(1, MAX_ITERATIONS);

        let mut theta = 0.0f64;
        let mut converged = false;
        let mut iterations = 0u32;

        while iterations < max_iterations {
            iterations += 1;

            let (score, information) = score_and_information(theta, &items);
            if information < self.config.min_information {
                // Every P_i is saturated; theta is pinned at a boundary.
                converged = true;
                break;
            }

            let next = (theta + score / information).clamp(-bound, bound);
            let step = (next - theta).abs();
            theta = next;

            if step < self.config.tolerance {
                converged = true;
                break;
            }
        }

        let (_, information) = score_and_information(theta, &items);
        let standard_error = 1.0 / information.max(self.config.min_information).sqrt();
        let confidence_interval = self.interval_from_standard_error(standard_error);

        if converged {
            tracing::debug!(
                theta,
                standard_error,
                iterations,
                responses = responses.len(),
                "ability estimate converged"
            );
        } else {
            tracing::debug!(
                theta,
                standard_error,
                iterations,
                responses = responses.len(),
                "ability estimate did not converge within iteration budget"
            );
        }

        Ok(AbilityEstimate {
            theta,
            standard_error,
            confidence_interval,
            converged,
            iterations,
        })
    }

    /// Approximate the interval for `response_count` items before a full
    /// history exists, assuming items of average difficulty (logit 0).
    pub fn confidence_interval(&self, theta: f64, response_count: usize) -> f64 {
        if response_count == 0 || !theta.is_finite() {
            return CONFIDENCE_INTERVAL_CAP;
        }
        let bound = self.config.theta_bound;
        let p = probability(theta.clamp(-bound, bound), 0.0);
        let information = response_count as f64 * p * (1.0 - p);
        let standard_error = 1.0 / information.max(self.config.min_information).sqrt();
        self.interval_from_standard_error(standard_error)
    }

    /// Half-width in percentage points, capped at the full scale.
    fn interval_from_standard_error(&self, standard_error: f64) -> f64 {
        (self.config.confidence_z * standard_error * self.config.interval_points_per_logit)
            .min(CONFIDENCE_INTERVAL_CAP)
    }
}

/// Score (first derivative) and information (negative second derivative) of
/// the log-likelihood at `theta`. `items` holds `(logit difficulty, u_i)`.
fn score_and_information(theta: f64, items: &[(f64, f64)]) -> (f64, f64) {
    items
        .iter()
        .fold((0.0, 0.0), |(score, information), &(difficulty, outcome)| {
            let p = probability(theta, difficulty);
            (score + (outcome - p), information + p * (1.0 - p))
        })
}

/// Estimate ability with the default configuration.
pub fn estimate_theta(responses: &[Response]) -> Result<AbilityEstimate> {
    AbilityEstimator::default().estimate(responses)
}

/// Standalone interval approximation with the default configuration.
pub fn calculate_confidence_interval(theta: f64, response_count: usize) -> f64 {
    AbilityEstimator::default().confidence_interval(theta, response_count)
}
