use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::{checked_sum, percent_of};
use crate::config::AlertThresholds;
use crate::error::{AnalyticsError, Result};
use crate::models::{BudgetLimits, BudgetStatus, CategoryAggregate, CategoryId};

/// Compare actual spend against a category limit.
///
/// Fails with `InvalidLimit` when `limit` is zero or negative, whatever
/// `spent` is.
pub fn evaluate_budget(
    category: CategoryId,
    spent: Decimal,
    limit: Decimal,
    thresholds: &AlertThresholds,
) -> Result<BudgetStatus> {
    if limit <= Decimal::ZERO {
        return Err(AnalyticsError::InvalidLimit { limit });
    }

    // utilization_percent() scales by 100, so that must fit too
    let utilization = spent
        .checked_div(limit)
        .filter(|u| u.checked_mul(Decimal::ONE_HUNDRED).is_some())
        .ok_or(AnalyticsError::Overflow {
            what: "budget utilization",
        })?;
    let alert_level = thresholds.level_for(utilization);

    Ok(BudgetStatus {
        category,
        limit,
        spent,
        utilization,
        alert_level,
    })
}

/// Evaluate every configured limit against the matching category's spend.
/// Categories with a limit but no spend count as zero spent. Ordered by
/// utilization (highest first), then category order.
pub fn evaluate_budgets(
    aggregates: &[CategoryAggregate],
    limits: &BudgetLimits,
    thresholds: &AlertThresholds,
) -> Result<Vec<BudgetStatus>> {
    let mut statuses = limits
        .iter()
        .map(|(category, limit)| {
            let spent = aggregates
                .iter()
                .find(|a| a.category == *category)
                .map(|a| a.total_amount)
                .unwrap_or(Decimal::ZERO);
            evaluate_budget(*category, spent, *limit, thresholds)
        })
        .collect::<Result<Vec<_>>>()?;

    statuses.sort_by(|a, b| {
        b.utilization
            .cmp(&a.utilization)
            .then(a.category.cmp(&b.category))
    });

    debug!(
        budgets = statuses.len(),
        over = statuses.iter().filter(|s| s.utilization >= thresholds.exceeded_threshold).count(),
        "Evaluated budgets"
    );
    Ok(statuses)
}

/// Totals across all evaluated budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    /// May go negative once spending passes the combined limit.
    pub remaining: Decimal,
    /// Share of the combined limit still unspent, or `None` with no budgets.
    pub remaining_percent: Option<Decimal>,
}

pub fn summarize_budgets(statuses: &[BudgetStatus]) -> Result<BudgetSummary> {
    let total_limit = checked_sum(statuses.iter().map(|s| s.limit))?;
    let total_spent = checked_sum(statuses.iter().map(|s| s.spent))?;
    let remaining = total_limit - total_spent;
    let remaining_percent = if statuses.is_empty() {
        None
    } else {
        Some(percent_of(remaining, total_limit)?)
    };

    Ok(BudgetSummary {
        total_limit,
        total_spent,
        remaining,
        remaining_percent,
    })
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
