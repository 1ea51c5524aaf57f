//! adaptest configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::estimator::{EstimatorConfig, MAX_ITERATIONS};
use crate::reporting::ReportingConfig;
use crate::session::SessionConfig;
use crate::stopping::StoppingRule;

/// Top-level adaptest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptestConfig {
    /// Ability estimator settings.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Early-termination thresholds.
    #[serde(default)]
    pub stopping: StoppingRule,
    /// Efficiency accounting.
    #[serde(default)]
    pub reporting: ReportingConfig,
    /// Max concurrent simulated sessions.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_parallelism() -> usize {
    4
}

impl Default for AdaptestConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            stopping: StoppingRule::default(),
            reporting: ReportingConfig::default(),
            parallelism: default_parallelism(),
        }
    }
}

impl AdaptestConfig {
    /// Settings for a single adaptive session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            estimator: self.estimator.clone(),
            stopping: self.stopping.clone(),
            reporting: self.reporting.clone(),
        }
    }

    /// Settings for the concurrent assessment engine.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            parallelism: self.parallelism,
            session: self.session_config(),
        }
    }

    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        let est = &self.estimator;
        anyhow::ensure!(
            (1..=MAX_ITERATIONS).contains(&est.max_iterations),
            "estimator.max_iterations must be between 1 and {MAX_ITERATIONS}, got {}",
            est.max_iterations
        );
        anyhow::ensure!(
            est.tolerance > 0.0,
            "estimator.tolerance must be positive, got {}",
            est.tolerance
        );
        anyhow::ensure!(
            est.theta_bound > 0.0 && est.theta_bound.is_finite(),
            "estimator.theta_bound must be a positive number, got {}",
            est.theta_bound
        );
        anyhow::ensure!(
            est.min_information > 0.0,
            "estimator.min_information must be positive, got {}",
            est.min_information
        );
        anyhow::ensure!(
            est.confidence_z > 0.0,
            "estimator.confidence_z must be positive, got {}",
            est.confidence_z
        );
        anyhow::ensure!(
            est.interval_points_per_logit > 0.0 && est.interval_points_per_logit.is_finite(),
            "estimator.interval_points_per_logit must be a positive number, got {}",
            est.interval_points_per_logit
        );
        anyhow::ensure!(
            self.stopping.max_confidence_interval > 0.0,
            "stopping.max_confidence_interval must be positive, got {}",
            self.stopping.max_confidence_interval
        );
        if let Some(cap) = self.stopping.max_questions {
            anyhow::ensure!(
                cap >= self.stopping.min_questions,
                "stopping.max_questions ({cap}) is below stopping.min_questions ({})",
                self.stopping.min_questions
            );
        }
        anyhow::ensure!(
            self.reporting.baseline_questions >= 1,
            "reporting.baseline_questions must be at least 1"
        );
        anyhow::ensure!(self.parallelism >= 1, "parallelism must be at least 1");
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `adaptest.toml` in the current directory
/// 2. `~/.config/adaptest/config.toml`
///
/// Environment variable overrides: `ADAPTEST_BASELINE_QUESTIONS`,
/// `ADAPTEST_MIN_QUESTIONS`, `ADAPTEST_MAX_CI`, `ADAPTEST_PARALLELISM`.
pub fn load_config() -> Result<AdaptestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptest.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AdaptestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AdaptestConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn env_override<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("invalid value for {name}: '{raw}'")),
        Err(_) => Ok(None),
    }
}

fn apply_env_overrides(config: &mut AdaptestConfig) -> Result<()> {
    if let Some(v) = env_override("ADAPTEST_BASELINE_QUESTIONS")? {
        config.reporting.baseline_questions = v;
    }
    if let Some(v) = env_override("ADAPTEST_MIN_QUESTIONS")? {
        config.stopping.min_questions = v;
    }
    if let Some(v) = env_override("ADAPTEST_MAX_CI")? {
        config.stopping.max_confidence_interval = v;
    }
    if let Some(v) = env_override("ADAPTEST_PARALLELISM")? {
        config.parallelism = v;
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptest"))
}
