//! adaptest-core — Rasch ability estimation, stopping rules and item analysis.
//!
//! This crate holds the numerical engine (item response model, Newton-Raphson
//! ability estimator, stopping rule, discrimination index), the reporting
//! helpers that turn estimates into learner-facing numbers, and the session
//! engine that drives adaptive assessments against an item bank.

pub mod config;
pub mod discrimination;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod irt;
pub mod model;
pub mod parser;
pub mod report;
pub mod reporting;
pub mod results;
pub mod session;
pub mod statistics;
pub mod stopping;
pub mod validation;

pub use discrimination::{calculate_discrimination_index, interpret_discrimination};
pub use error::{ErrorKind, InvalidInput, IrtError};
pub use estimator::{calculate_confidence_interval, estimate_theta};
pub use reporting::{calculate_efficiency_gain, describe_knowledge_level, theta_to_percentage};
pub use stopping::should_terminate_early;
pub use validation::validate_irt_responses;
