//! Assessment engine orchestrator.
//!
//! Drives one adaptive session per examinee against a shared item bank,
//! running sessions concurrently up to a parallelism limit. Each session loops
//! select → answer → re-estimate until the stopping rule fires or the bank is
//! exhausted. Sessions share nothing but the read-only bank.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::model::{ItemBank, Response};
use crate::report::{AssessmentReport, BankSummary};
use crate::results::{AdministeredItem, SessionRecord};
use crate::session::{AdaptiveSession, Examinee, ItemSelector, SessionConfig, SessionStep};
use crate::statistics::compute_aggregate_stats;

/// Configuration for the assessment engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum concurrent sessions.
    pub parallelism: usize,
    /// Estimation, stopping and reporting settings for every session.
    pub session: SessionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            session: SessionConfig::default(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_session_start(&self, examinee_id: &str);
    fn on_item_answered(&self, examinee_id: &str, item_id: &str, step: &SessionStep);
    fn on_session_complete(&self, record: &SessionRecord);
    fn on_session_error(&self, examinee_id: &str, error: &str);
    fn on_run_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_session_start(&self, _: &str) {}
    fn on_item_answered(&self, _: &str, _: &str, _: &SessionStep) {}
    fn on_session_complete(&self, _: &SessionRecord) {}
    fn on_session_error(&self, _: &str, _: &str) {}
    fn on_run_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// The central assessment engine.
pub struct AssessmentEngine {
    selector: Arc<dyn ItemSelector>,
    config: EngineConfig,
}

impl AssessmentEngine {
    pub fn new(selector: Arc<dyn ItemSelector>, config: EngineConfig) -> Self {
        Self { selector, config }
    }

    /// Run one adaptive session per examinee.
    pub async fn run(
        &self,
        bank: &ItemBank,
        examinees: &[Arc<dyn Examinee>],
        progress: &dyn ProgressReporter,
    ) -> Result<AssessmentReport> {
        anyhow::ensure!(
            !bank.items.is_empty(),
            "item bank '{}' has no items",
            bank.id
        );

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut futures = FuturesUnordered::new();

        for examinee in examinees {
            let examinee = Arc::clone(examinee);
            let selector = Arc::clone(&self.selector);
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.session.clone();

            futures.push(async move {
                let examinee_id = examinee.id().to_string();
                let ctx_examinee_id = examinee_id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_session_start(&examinee_id);
                    run_session(bank, examinee.as_ref(), selector.as_ref(), config, progress).await
                };
                (ctx_examinee_id, inner.await)
            });
        }

        let mut sessions = Vec::new();
        let mut completed = 0usize;
        let mut failed = 0usize;
        let total = futures.len();

        while let Some((examinee_id, result)) = futures.next().await {
            match result {
                Ok(record) => {
                    progress.on_session_complete(&record);
                    sessions.push(record);
                    completed += 1;
                }
                Err(e) => {
                    tracing::error!("session failed for {examinee_id}: {e:#}");
                    progress.on_session_error(&examinee_id, &e.to_string());
                    failed += 1;
                }
            }
        }

        // Completion order is nondeterministic; report in a stable order.
        sessions.sort_by(|a, b| a.examinee_id.cmp(&b.examinee_id));

        let elapsed = start.elapsed();
        progress.on_run_complete(total, completed, failed, elapsed);

        Ok(AssessmentReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            bank: BankSummary {
                id: bank.id.clone(),
                name: bank.name.clone(),
                item_count: bank.items.len(),
            },
            aggregate: compute_aggregate_stats(&sessions),
            sessions,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Drive a single adaptive session to completion.
pub async fn run_session(
    bank: &ItemBank,
    examinee: &dyn Examinee,
    selector: &dyn ItemSelector,
    config: SessionConfig,
    progress: &dyn ProgressReporter,
) -> Result<SessionRecord> {
    let start = Instant::now();
    let mut session = AdaptiveSession::new(config);
    let mut administered = HashSet::new();
    let mut items = Vec::new();
    let mut bank_exhausted = false;

    while !session.is_complete() {
        let Some(item) = selector.select(bank, session.current_theta(), &administered) else {
            bank_exhausted = true;
            tracing::warn!(
                "item bank '{}' exhausted after {} items for {}",
                bank.id,
                items.len(),
                examinee.id()
            );
            break;
        };

        let correct = examinee.answer(item).await?;
        let step = session.record(Response::new(item.difficulty, correct))?;
        progress.on_item_answered(examinee.id(), &item.id, &step);

        administered.insert(item.id.clone());
        items.push(AdministeredItem {
            item_id: item.id.clone(),
            difficulty: item.difficulty,
            correct,
        });
    }

    let summary = session.summary()?;
    Ok(SessionRecord {
        examinee_id: examinee.id().to_string(),
        true_theta: examinee.true_theta(),
        items,
        summary,
        bank_exhausted,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use crate::session::{MaxInformationSelector, ScriptedExaminee, SimulatedExaminee};
    use crate::stopping::StoppingRule;

    fn spread_bank(n: usize) -> ItemBank {
        ItemBank {
            id: "spread".into(),
            name: "Spread".into(),
            description: String::new(),
            items: (0..n)
                .map(|i| Item {
                    id: format!("q{i:02}"),
                    prompt: String::new(),
                    difficulty: 100.0 * i as f64 / (n - 1) as f64,
                    topic: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn session_runs_until_bank_exhausted() {
        let bank = spread_bank(5);
        let examinee = SimulatedExaminee::new("sim", 0.5);
        let record = run_session(
            &bank,
            &examinee,
            &MaxInformationSelector,
            SessionConfig::default(),
            &NoopReporter,
        )
        .await
        .unwrap();
        // Five answers leave the interval wider than ±10.
        assert!(record.bank_exhausted);
        assert_eq!(record.items.len(), 5);
        assert!(!record.summary.stopped_early);
        assert_eq!(record.true_theta, Some(0.5));
    }

    #[tokio::test]
    async fn default_session_stops_before_baseline() {
        let bank = spread_bank(21);
        for theta in [-2.0, 0.0, 0.5, 2.5] {
            let examinee = SimulatedExaminee::new("sim", theta);
            let record = run_session(
                &bank,
                &examinee,
                &MaxInformationSelector,
                SessionConfig::default(),
                &NoopReporter,
            )
            .await
            .unwrap();
            let summary = &record.summary;
            assert!(summary.stopped_early, "theta {theta} ran {} items", summary.questions_asked);
            assert!(!record.bank_exhausted);
            assert!(summary.questions_asked < 15);
            assert!(summary.estimate.confidence_interval < 10.0);
            assert!(summary.efficiency.efficiency_score > 0);
        }
    }

    #[tokio::test]
    async fn session_stops_on_precision_target() {
        let bank = spread_bank(21);
        let config = SessionConfig {
            stopping: StoppingRule {
                max_confidence_interval: 45.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let examinee = ScriptedExaminee::new("script", [true, false].repeat(5));
        let record = run_session(&bank, &examinee, &MaxInformationSelector, config, &NoopReporter)
            .await
            .unwrap();
        assert!(record.summary.stopped_early);
        assert!(!record.bank_exhausted);
        assert!(record.items.len() >= 3);
        let ids: HashSet<_> = record.items.iter().map(|i| i.item_id.clone()).collect();
        assert_eq!(ids.len(), record.items.len(), "items must not repeat");
    }

    #[tokio::test]
    async fn engine_runs_sessions_and_counts_failures() {
        let bank = spread_bank(11);
        let examinees: Vec<Arc<dyn Examinee>> = vec![
            Arc::new(SimulatedExaminee::new("b-high", 2.0)),
            Arc::new(SimulatedExaminee::new("a-low", -2.0)),
            Arc::new(ScriptedExaminee::new("c-short", vec![true])),
        ];
        let engine = AssessmentEngine::new(
            Arc::new(MaxInformationSelector),
            EngineConfig {
                parallelism: 2,
                ..Default::default()
            },
        );

        let report = engine.run(&bank, &examinees, &NoopReporter).await.unwrap();

        assert_eq!(report.sessions.len(), 2);
        assert_eq!(report.sessions[0].examinee_id, "a-low");
        assert_eq!(report.sessions[1].examinee_id, "b-high");
        assert!(report.sessions[0].summary.estimate.theta < report.sessions[1].summary.estimate.theta);
        assert_eq!(report.aggregate.session_count, 2);
        assert_eq!(report.bank.item_count, 11);
    }

    #[tokio::test]
    async fn empty_bank_is_an_error() {
        let bank = ItemBank {
            id: "empty".into(),
            name: "Empty".into(),
            description: String::new(),
            items: vec![],
        };
        let engine = AssessmentEngine::new(Arc::new(MaxInformationSelector), EngineConfig::default());
        assert!(engine.run(&bank, &[], &NoopReporter).await.is_err());
    }
}
