//! Engine configuration, loaded once at start-up and read-only afterwards.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categorize::default_rules;
use crate::error::AnalyticsError;
use crate::models::{AlertLevel, BudgetLimits, KeywordRule, PeriodGranularity};

/// Utilization ratios at which a budget turns to `warning` / `exceeded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub warning_threshold: Decimal,
    pub exceeded_threshold: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning_threshold: Decimal::new(85, 2),
            exceeded_threshold: Decimal::ONE,
        }
    }
}

impl AlertThresholds {
    pub fn level_for(&self, utilization: Decimal) -> AlertLevel {
        if utilization >= self.exceeded_threshold {
            AlertLevel::Exceeded
        } else if utilization >= self.warning_threshold {
            AlertLevel::Warning
        } else {
            AlertLevel::Ok
        }
    }
}

/// Tuning for the insight generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Number of prior periods averaged as a category's baseline.
    pub lookback_periods: usize,
    /// Percent above baseline at which current spend counts as an anomaly.
    pub anomaly_threshold_percent: Decimal,
    /// Minimum absolute change for a per-category trend insight.
    pub trend_threshold_percent: Decimal,
    /// Cap on the number of insights returned; `None` keeps all.
    pub max_items: Option<usize>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            lookback_periods: 3,
            anomaly_threshold_percent: Decimal::from(25),
            trend_threshold_percent: Decimal::TEN,
            max_items: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub alerts: AlertThresholds,
    pub insights: InsightConfig,
    pub period: PeriodGranularity,
    pub budgets: BudgetLimits,
    /// Ordered classifier table. Empty means the built-in table.
    pub rules: Vec<KeywordRule>,
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        debug!(path = %path.display(), budgets = config.budgets.len(), "Loaded config");
        Ok(config)
    }

    /// An explicit path must exist. Without one, the per-user default file is
    /// used when present, otherwise built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let alerts = &self.alerts;
        if alerts.warning_threshold <= Decimal::ZERO || alerts.exceeded_threshold <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidConfig(
                "alert thresholds must be greater than zero".into(),
            ));
        }
        if alerts.warning_threshold >= alerts.exceeded_threshold {
            return Err(AnalyticsError::InvalidConfig(format!(
                "warning threshold {} must be below exceeded threshold {}",
                alerts.warning_threshold, alerts.exceeded_threshold
            )));
        }
        if self.insights.lookback_periods == 0 {
            return Err(AnalyticsError::InvalidConfig(
                "lookback_periods must be at least 1".into(),
            ));
        }
        if self.insights.anomaly_threshold_percent < Decimal::ZERO
            || self.insights.trend_threshold_percent < Decimal::ZERO
        {
            return Err(AnalyticsError::InvalidConfig(
                "insight thresholds must not be negative".into(),
            ));
        }
        if let Some(limit) = self.budgets.values().find(|l| **l <= Decimal::ZERO) {
            return Err(AnalyticsError::InvalidLimit { limit: *limit });
        }
        Ok(())
    }

    /// The classifier table to use: configured rules, or the built-in table.
    pub fn keyword_rules(&self) -> Vec<KeywordRule> {
        if self.rules.is_empty() {
            default_rules()
        } else {
            self.rules.clone()
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendlens", "SpendLens")?;
    Some(proj_dirs.config_dir().join("config.json"))
}
