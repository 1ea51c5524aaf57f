//! One-parameter logistic (Rasch) item response model.
//!
//! `P(correct | theta, b) = 1 / (1 + exp(-(theta - b)))`
//!
//! Item difficulties arrive on the calibrated 0-100 scale and are mapped
//! linearly onto the ability logit scale: 50 is the centre (logit 0) and the
//! full 0-100 range spans -5..+5 logits.

use crate::model::Response;

/// Lowest valid calibrated difficulty.
pub const DIFFICULTY_MIN: f64 = 0.0;
/// Highest valid calibrated difficulty.
pub const DIFFICULTY_MAX: f64 = 100.0;
/// Calibrated difficulty that maps to logit 0.
pub const DIFFICULTY_MIDPOINT: f64 = 50.0;
/// Calibration points per logit.
pub const POINTS_PER_LOGIT: f64 = 10.0;

/// Convert a 0-100 calibrated difficulty to the logit scale.
#[inline]
pub fn difficulty_to_logit(difficulty: f64) -> f64 {
    (difficulty - DIFFICULTY_MIDPOINT) / POINTS_PER_LOGIT
}

/// Numerically stable logistic function.
#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp_x = x.exp();
        exp_x / (1.0 + exp_x)
    }
}

/// Probability of a correct answer given ability and logit difficulty.
///
/// Exactly 0.5 when `theta == difficulty`, monotonically increasing in
/// `theta - difficulty`. Defined for all finite inputs.
#[inline]
pub fn probability(theta: f64, difficulty: f64) -> f64 {
    sigmoid(theta - difficulty)
}

/// Fisher information contributed by one item at `theta`: `P(1 - P)`.
#[inline]
pub fn item_information(theta: f64, difficulty: f64) -> f64 {
    let p = probability(theta, difficulty);
    p * (1.0 - p)
}

/// Log-likelihood of a response history at `theta`.
pub fn log_likelihood(theta: f64, responses: &[Response]) -> f64 {
    responses
        .iter()
        .map(|r| {
            let z = theta - difficulty_to_logit(r.item_difficulty);
            // log(sigmoid(z)) computed without overflow
            let log_p = |x: f64| {
                if x >= 0.0 {
                    -(-x).exp().ln_1p()
                } else {
                    x - x.exp().ln_1p()
                }
            };
            if r.correct {
                log_p(z)
            } else {
                log_p(-z)
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_probability_at_equal_ability() {
        for x in [-4.0, -1.25, 0.0, 0.5, 3.0] {
            assert_eq!(probability(x, x), 0.5);
        }
    }

    #[test]
    fn logistic_symmetry() {
        let p = probability(1.0, 0.0);
        let q = probability(0.0, 1.0);
        assert!((p - 0.731).abs() < 0.001, "expected ~0.731, got {p}");
        assert!((q - 0.269).abs() < 0.001, "expected ~0.269, got {q}");
        assert!((p + q - 1.0).abs() < 1e-12);
    }

    #[test]
    fn probability_is_monotonic_and_saturates() {
        let mut prev = 0.0;
        for step in -20..=20 {
            let p = probability(step as f64 * 0.5, 0.0);
            assert!(p > prev);
            prev = p;
        }
        assert!(probability(-800.0, 0.0) >= 0.0);
        assert!(probability(800.0, 0.0) <= 1.0);
        assert!(probability(800.0, 0.0).is_finite());
    }

    #[test]
    fn difficulty_scale_mapping() {
        assert_eq!(difficulty_to_logit(50.0), 0.0);
        assert_eq!(difficulty_to_logit(0.0), -5.0);
        assert_eq!(difficulty_to_logit(100.0), 5.0);
        assert_eq!(difficulty_to_logit(65.0), 1.5);
    }

    #[test]
    fn information_peaks_at_matching_difficulty() {
        assert_eq!(item_information(0.0, 0.0), 0.25);
        assert!(item_information(0.0, 2.0) < 0.25);
        assert!(item_information(0.0, -2.0) < 0.25);
    }

    #[test]
    fn log_likelihood_prefers_the_data() {
        let all_right = vec![Response::correct(50.0); 4];
        assert!(log_likelihood(2.0, &all_right) > log_likelihood(-2.0, &all_right));
        let ll = log_likelihood(0.0, &[Response::correct(50.0)]);
        assert!((ll - 0.5f64.ln()).abs() < 1e-12);
    }
}
