//! Engine error types.
//!
//! The estimation engine has exactly one failure mode: the caller handed it
//! input it cannot compute on. Numerical trouble (for example an estimate that
//! does not converge inside the iteration budget) is reported as data, never as
//! an error, so an assessment flow can ask for another response instead of
//! aborting.

use std::fmt;

use thiserror::Error;

/// Errors returned by the estimation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrtError {
    /// The input was malformed or outside the domain of the computation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Coarse error classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
}

impl IrtError {
    /// The error kind. Every engine error is an input error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IrtError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// The detailed reason behind this error.
    pub fn reason(&self) -> &InvalidInput {
        match self {
            IrtError::InvalidInput(reason) => reason,
        }
    }
}

/// Which performance group a score array belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreGroup {
    Top,
    Bottom,
}

impl fmt::Display for ScoreGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreGroup::Top => write!(f, "top"),
            ScoreGroup::Bottom => write!(f, "bottom"),
        }
    }
}

/// Why a piece of input was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    /// No responses were supplied.
    #[error("responses must be a non-empty list")]
    EmptyResponses,

    /// The response payload was not a list.
    #[error("responses must be an array")]
    NotAnArray,

    /// A response entry was not an object.
    #[error("response {index} must be an object")]
    NotAnObject { index: usize },

    /// A response had no numeric difficulty.
    #[error("response {index} is missing a numeric item difficulty")]
    MissingDifficulty { index: usize },

    /// A difficulty was NaN or infinite.
    #[error("response {index} has a non-finite item difficulty")]
    NonFiniteDifficulty { index: usize },

    /// A difficulty fell outside the calibrated 0-100 scale.
    #[error("response {index} has item difficulty {value}, expected a value in [0, 100]")]
    DifficultyOutOfRange { index: usize, value: f64 },

    /// A correctness flag was missing or not a boolean.
    #[error("response {index} must have a boolean `correct` flag")]
    NonBooleanCorrectness { index: usize },

    /// A discrimination score group was empty.
    #[error("{group} group scores must not be empty")]
    EmptyScores { group: ScoreGroup },

    /// A discrimination score was something other than 0 or 1.
    #[error("{group} group score at position {index} is {value}, expected 0 or 1")]
    NonBinaryScore {
        group: ScoreGroup,
        index: usize,
        value: i64,
    },

    /// A question count was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveCount { field: &'static str, value: i64 },

    /// Item analysis records were empty.
    #[error("item analysis requires at least one examinee record")]
    EmptyRecords,

    /// The top/bottom split fraction was outside (0, 0.5].
    #[error("group fraction {0} must be in (0, 0.5]")]
    InvalidGroupFraction(f64),
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, IrtError>;
