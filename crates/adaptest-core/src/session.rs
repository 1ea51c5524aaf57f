//! Adaptive session driver and the seams to its external collaborators.
//!
//! An [`AdaptiveSession`] owns one learner's growing response history. After
//! every answer it re-estimates ability from the full history and consults the
//! stopping rule. Which item to ask next ([`ItemSelector`]) and who answers it
//! ([`Examinee`]) live outside the engine; the reference implementations here
//! exist for simulation and testing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInput, Result};
use crate::estimator::{AbilityEstimator, EstimatorConfig};
use crate::irt::{difficulty_to_logit, probability};
use crate::model::{
    AbilityEstimate, EfficiencyReport, Item, ItemBank, KnowledgeLevel, Response, StoppingDecision,
};
use crate::reporting::{describe_knowledge_level, theta_to_percentage, ReportingConfig};
use crate::stopping::StoppingRule;

/// Everything a session needs to estimate, stop, and report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub estimator: EstimatorConfig,
    pub stopping: StoppingRule,
    pub reporting: ReportingConfig,
}

/// Outcome of recording one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStep {
    /// 1-based position of the answer just recorded.
    pub question_number: u32,
    pub estimate: AbilityEstimate,
    pub decision: StoppingDecision,
    pub percentage: f64,
    pub knowledge_level: KnowledgeLevel,
}

/// Final verdict for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub questions_asked: u32,
    pub estimate: AbilityEstimate,
    pub percentage: f64,
    pub knowledge_level: KnowledgeLevel,
    /// Whether the stopping rule was satisfied.
    pub stopped_early: bool,
    pub reason: String,
    pub efficiency: EfficiencyReport,
}

/// One learner's adaptive assessment.
#[derive(Debug, Clone)]
pub struct AdaptiveSession {
    estimator: AbilityEstimator,
    stopping: StoppingRule,
    reporting: ReportingConfig,
    responses: Vec<Response>,
    latest: Option<SessionStep>,
}

impl Default for AdaptiveSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl AdaptiveSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            estimator: AbilityEstimator::new(config.estimator),
            stopping: config.stopping,
            reporting: config.reporting,
            responses: Vec::new(),
            latest: None,
        }
    }

    /// Resume a session from a previously recorded history.
    pub fn with_history(config: SessionConfig, history: &[Response]) -> Result<Self> {
        let mut session = Self::new(config);
        for &response in history {
            session.record(response)?;
        }
        Ok(session)
    }

    /// Record an answer, re-estimate, and evaluate the stopping rule.
    ///
    /// An invalid response is rejected and leaves the history untouched.
    pub fn record(&mut self, response: Response) -> Result<SessionStep> {
        let mut candidate = Vec::with_capacity(self.responses.len() + 1);
        candidate.extend_from_slice(&self.responses);
        candidate.push(response);

        let estimate = self.estimator.estimate(&candidate)?;
        self.responses = candidate;

        let question_number = self.responses.len() as u32;
        if !estimate.converged {
            tracing::warn!(
                question_number,
                theta = estimate.theta,
                "ability estimate did not converge, continuing with best estimate"
            );
        }

        let decision = self
            .stopping
            .evaluate(estimate.confidence_interval, question_number);

        let step = SessionStep {
            question_number,
            estimate,
            decision,
            percentage: theta_to_percentage(estimate.theta),
            knowledge_level: describe_knowledge_level(estimate.theta),
        };
        self.latest = Some(step.clone());
        Ok(step)
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn latest(&self) -> Option<&SessionStep> {
        self.latest.as_ref()
    }

    /// Current ability estimate, 0 before any answer.
    pub fn current_theta(&self) -> f64 {
        self.latest.as_ref().map_or(0.0, |s| s.estimate.theta)
    }

    pub fn is_complete(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|s| s.decision.should_stop)
    }

    /// Summarise the session. Fails if nothing has been recorded.
    pub fn summary(&self) -> Result<SessionSummary> {
        let step = self
            .latest
            .as_ref()
            .ok_or(InvalidInput::EmptyResponses)?;
        let efficiency = self.reporting.efficiency(i64::from(step.question_number))?;

        Ok(SessionSummary {
            questions_asked: step.question_number,
            estimate: step.estimate,
            percentage: step.percentage,
            knowledge_level: step.knowledge_level,
            stopped_early: step.decision.should_stop,
            reason: step.decision.reason.clone(),
            efficiency,
        })
    }
}

// ---------------------------------------------------------------------------
// Item selection
// ---------------------------------------------------------------------------

/// Chooses the next item to administer.
pub trait ItemSelector: Send + Sync {
    /// Pick an unadministered item for the current ability estimate, or
    /// `None` if the bank is exhausted.
    fn select<'a>(
        &self,
        bank: &'a ItemBank,
        theta: f64,
        administered: &HashSet<String>,
    ) -> Option<&'a Item>;
}

/// Maximum-information selection. Under the Rasch model an item's Fisher
/// information `P(1 - P)` peaks where its difficulty equals theta, so the
/// closest unadministered difficulty wins. Ties go to the earlier item.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxInformationSelector;

impl ItemSelector for MaxInformationSelector {
    fn select<'a>(
        &self,
        bank: &'a ItemBank,
        theta: f64,
        administered: &HashSet<String>,
    ) -> Option<&'a Item> {
        let mut best: Option<(&Item, f64)> = None;
        for item in bank.items.iter().filter(|i| !administered.contains(&i.id)) {
            let distance = (difficulty_to_logit(item.difficulty) - theta).abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((item, distance));
            }
        }
        best.map(|(item, _)| item)
    }
}

// ---------------------------------------------------------------------------
// Examinees
// ---------------------------------------------------------------------------

/// Someone (or something) that answers items.
#[async_trait]
pub trait Examinee: Send + Sync {
    /// Identifier used in reports.
    fn id(&self) -> &str;

    /// Answer an item; `true` for correct.
    async fn answer(&self, item: &Item) -> anyhow::Result<bool>;

    /// Known true ability, for simulated examinees.
    fn true_theta(&self) -> Option<f64> {
        None
    }
}

/// Deterministic simulated examinee: answers correctly exactly when the
/// Rasch probability at its true ability is at least one half.
#[derive(Debug, Clone)]
pub struct SimulatedExaminee {
    id: String,
    theta: f64,
}

impl SimulatedExaminee {
    pub fn new(id: impl Into<String>, theta: f64) -> Self {
        Self {
            id: id.into(),
            theta,
        }
    }
}

#[async_trait]
impl Examinee for SimulatedExaminee {
    fn id(&self) -> &str {
        &self.id
    }

    async fn answer(&self, item: &Item) -> anyhow::Result<bool> {
        Ok(probability(self.theta, difficulty_to_logit(item.difficulty)) >= 0.5)
    }

    fn true_theta(&self) -> Option<f64> {
        Some(self.theta)
    }
}

/// Replays a fixed list of answers in order.
#[derive(Debug)]
pub struct ScriptedExaminee {
    id: String,
    answers: Vec<bool>,
    cursor: AtomicUsize,
}

impl ScriptedExaminee {
    pub fn new(id: impl Into<String>, answers: Vec<bool>) -> Self {
        Self {
            id: id.into(),
            answers,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of answers given so far.
    pub fn call_count(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Examinee for ScriptedExaminee {
    fn id(&self) -> &str {
        &self.id
    }

    async fn answer(&self, item: &Item) -> anyhow::Result<bool> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.answers.get(index).copied().ok_or_else(|| {
            anyhow::anyhow!(
                "script for {} exhausted after {} answers (asked {})",
                self.id,
                self.answers.len(),
                item.id
            )
        })
    }
}
