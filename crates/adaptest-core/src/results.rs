//! Per-session result types produced by the assessment engine.

use serde::{Deserialize, Serialize};

use crate::session::SessionSummary;

/// One administered item and the answer it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministeredItem {
    pub item_id: String,
    pub difficulty: f64,
    pub correct: bool,
}

/// The complete record of one adaptive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub examinee_id: String,
    /// Known ability for simulated examinees.
    #[serde(default)]
    pub true_theta: Option<f64>,
    /// Items in the order they were administered.
    pub items: Vec<AdministeredItem>,
    pub summary: SessionSummary,
    /// Whether the session ended because the bank ran out of items.
    #[serde(default)]
    pub bank_exhausted: bool,
    pub duration_ms: u64,
}

impl SessionRecord {
    /// Absolute estimation error, when the true ability is known.
    pub fn absolute_error(&self) -> Option<f64> {
        self.true_theta
            .map(|truth| (self.summary.estimate.theta - truth).abs())
    }
}
