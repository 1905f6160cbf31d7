use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{aggregate_by_category, aggregate_by_period_filled, latest_period, records_in_period};
use super::checked_sum;
use super::budget::{evaluate_budgets, summarize_budgets, BudgetSummary};
use super::trend::evaluate_trend;
use crate::config::AlertThresholds;
use crate::error::Result;
use crate::models::{BudgetLimits, CategoryAggregate, ExpenseRecord, PeriodGranularity, TrendDirection};

/// Quick stats for the most recent period in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Latest period with any records; `None` for an empty collection.
    pub period_label: Option<String>,
    pub record_count: usize,
    pub total_spent: Decimal,
    /// Change against the previous period; `None` with a single period or
    /// when the previous period had no spend.
    pub change_percent: Option<Decimal>,
    pub trend: Option<TrendDirection>,
    pub budget: BudgetSummary,
    pub top_category: Option<CategoryAggregate>,
}

pub fn overview(
    records: &[ExpenseRecord],
    limits: &BudgetLimits,
    thresholds: &AlertThresholds,
    granularity: PeriodGranularity,
) -> Result<Overview> {
    let totals = aggregate_by_period_filled(records, granularity)?;
    let signal = evaluate_trend(&totals).ok();

    let latest = latest_period(records, granularity);
    let current: Vec<&ExpenseRecord> = match latest {
        Some(period) => records_in_period(records, period).collect(),
        None => Vec::new(),
    };

    let aggregates = aggregate_by_category(current.iter().copied())?;
    let statuses = evaluate_budgets(&aggregates, limits, thresholds)?;

    Ok(Overview {
        period_label: latest.map(|p| p.label()),
        record_count: current.len(),
        total_spent: checked_sum(aggregates.iter().map(|a| a.total_amount))?,
        change_percent: signal.as_ref().and_then(|s| s.delta_percent),
        trend: signal.as_ref().map(|s| s.direction),
        budget: summarize_budgets(&statuses)?,
        top_category: aggregates.into_iter().next(),
    })
}

#[cfg(test)]
#[path = "overview_tests.rs"]
mod tests;
