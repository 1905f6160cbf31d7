use serde::Serialize;
use tracing::{debug, info};

use super::aggregate::{
    aggregate_by_category, aggregate_by_period_filled, category_history, latest_period,
    records_in_period,
};
use super::budget::{evaluate_budgets, summarize_budgets, BudgetSummary};
use super::insights::{generate_insights, InsightInputs};
use super::overview::{overview, Overview};
use super::trend::{evaluate_category_trends, evaluate_trend};
use crate::categorize::Classifier;
use crate::config::Config;
use crate::error::{AnalyticsError, Result};
use crate::models::{
    BudgetStatus, CategoryAggregate, CategoryId, ExpenseRecord, InsightItem, MonthlyAggregate,
    PeriodKey, TrendSignal,
};

/// Classifier plus configuration. Holds no derived state: every call
/// recomputes from the records it is given.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    classifier: Classifier,
    config: Config,
}

/// Everything a dashboard screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardReport {
    pub overview: Overview,
    pub categories: Vec<CategoryAggregate>,
    pub periods: Vec<MonthlyAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSignal>,
    pub budgets: Vec<BudgetStatus>,
    pub budget_summary: BudgetSummary,
    pub insights: Vec<InsightItem>,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnalyticsEngine {
    pub fn new(config: Config) -> Self {
        let classifier = Classifier::new(&config.keyword_rules());
        info!(
            rules = classifier.rule_count(),
            budgets = config.budgets.len(),
            period = config.period.as_str(),
            "Analytics engine ready"
        );
        Self { classifier, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn classify(&self, description: &str) -> CategoryId {
        self.classifier.classify(description)
    }

    /// Fill in missing categories in place.
    pub fn classify_records(&self, records: &mut [ExpenseRecord]) {
        self.classifier.classify_batch(records);
    }

    /// Category totals across the whole collection.
    pub fn category_breakdown(&self, records: &[ExpenseRecord]) -> Result<Vec<CategoryAggregate>> {
        aggregate_by_category(records)
    }

    /// Category totals for the latest period only.
    pub fn current_breakdown(&self, records: &[ExpenseRecord]) -> Result<Vec<CategoryAggregate>> {
        match latest_period(records, self.config.period) {
            Some(period) => aggregate_by_category(records_in_period(records, period)),
            None => Ok(Vec::new()),
        }
    }

    /// Contiguous per-period totals at the configured granularity.
    pub fn period_totals(&self, records: &[ExpenseRecord]) -> Result<Vec<MonthlyAggregate>> {
        aggregate_by_period_filled(records, self.config.period)
    }

    pub fn trend(&self, records: &[ExpenseRecord]) -> Result<TrendSignal> {
        evaluate_trend(&self.period_totals(records)?)
    }

    /// Budget statuses for `period`, or for the latest period when `None`.
    pub fn budgets(
        &self,
        records: &[ExpenseRecord],
        period: Option<PeriodKey>,
    ) -> Result<Vec<BudgetStatus>> {
        let period = period.or_else(|| latest_period(records, self.config.period));
        let aggregates = match period {
            Some(period) => aggregate_by_category(records_in_period(records, period))?,
            None => Vec::new(),
        };
        evaluate_budgets(&aggregates, &self.config.budgets, &self.config.alerts)
    }

    pub fn insights(&self, records: &[ExpenseRecord]) -> Result<Vec<InsightItem>> {
        let current = self.current_breakdown(records)?;
        let trend = self.optional_trend(records)?;
        let history = category_history(records, self.config.period)?;
        let category_trends = evaluate_category_trends(&history);
        let statuses = self.budgets(records, None)?;

        let inputs = InsightInputs {
            category_aggregates: &current,
            trend: trend.as_ref(),
            category_trends: &category_trends,
            budget_statuses: &statuses,
            history: &history,
        };
        generate_insights(&inputs, &self.config.insights)
    }

    pub fn overview(&self, records: &[ExpenseRecord]) -> Result<Overview> {
        overview(
            records,
            &self.config.budgets,
            &self.config.alerts,
            self.config.period,
        )
    }

    pub fn dashboard(&self, records: &[ExpenseRecord]) -> Result<DashboardReport> {
        let budgets = self.budgets(records, None)?;
        let report = DashboardReport {
            overview: self.overview(records)?,
            categories: self.current_breakdown(records)?,
            periods: self.period_totals(records)?,
            trend: self.optional_trend(records)?,
            budget_summary: summarize_budgets(&budgets)?,
            budgets,
            insights: self.insights(records)?,
        };
        debug!(
            records = records.len(),
            insights = report.insights.len(),
            "Built dashboard report"
        );
        Ok(report)
    }

    /// The overall trend, treating too few periods as "no trend yet".
    fn optional_trend(&self, records: &[ExpenseRecord]) -> Result<Option<TrendSignal>> {
        match self.trend(records) {
            Ok(signal) => Ok(Some(signal)),
            Err(AnalyticsError::InsufficientData { periods }) => {
                debug!(periods, "Not enough periods for a trend");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
