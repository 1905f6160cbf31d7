//! Insight generation: turns aggregates, trends and budget statuses into a
//! ranked list of display-ready observations.
//!
//! Ranking is by severity bucket first (exceeded budgets, then anomalies and
//! large increases, then near-limit budgets, then informational notes), then
//! by magnitude (largest first), then by id so the order is fully
//! deterministic.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use super::{checked_sum, round_percent, unrounded_percent};
use crate::config::InsightConfig;
use crate::error::Result;
use crate::models::{
    AlertLevel, BudgetStatus, CategoryAggregate, CategoryId, CategorySeries, Impact, InsightItem,
    InsightKind, Severity, TrendDirection, TrendSignal,
};
use crate::report::format_amount;

/// Everything the generator reads. All fields default to empty, and empty
/// inputs produce no insights.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightInputs<'a> {
    /// Current-period category breakdown.
    pub category_aggregates: &'a [CategoryAggregate],
    /// Overall spend trend across the last two periods.
    pub trend: Option<&'a TrendSignal>,
    pub category_trends: &'a [(CategoryId, TrendSignal)],
    pub budget_statuses: &'a [BudgetStatus],
    /// Per-category series on a shared grid; the last entry is the current period.
    pub history: &'a [CategorySeries],
}

pub fn generate_insights(
    inputs: &InsightInputs<'_>,
    config: &InsightConfig,
) -> Result<Vec<InsightItem>> {
    let mut items = Vec::new();

    items.extend(inputs.budget_statuses.iter().filter_map(budget_insight));

    let mut anomalies = Vec::new();
    for series in inputs.history {
        anomalies.extend(anomaly_insight(series, config)?);
    }
    let flagged: HashSet<CategoryId> = anomalies.iter().filter_map(|i| i.category).collect();
    items.extend(anomalies);

    if let Some(trend) = inputs.trend {
        items.push(overall_trend_insight(trend, config));
    }

    items.extend(
        inputs
            .category_trends
            .iter()
            .filter(|(category, _)| !flagged.contains(category))
            .filter_map(|(category, trend)| category_trend_insight(*category, trend, config)),
    );

    if let Some(note) = top_category_insight(inputs.category_aggregates) {
        items.push(note);
    }

    rank(&mut items);
    if let Some(max) = config.max_items {
        items.truncate(max);
    }

    debug!(count = items.len(), "Generated insights");
    Ok(items)
}

fn rank(items: &mut [InsightItem]) {
    items.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| match (a.magnitude_percent, b.magnitude_percent) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn budget_insight(status: &BudgetStatus) -> Option<InsightItem> {
    let name = status.category.display_name();
    let (title, description, impact, severity) = match status.alert_level {
        AlertLevel::Ok => return None,
        AlertLevel::Warning => (
            format!("{name} budget alert"),
            format!(
                "You have used {}% of your {name} budget ({} of {}).",
                status.utilization_percent().round_dp(0),
                format_amount(status.spent),
                format_amount(status.limit),
            ),
            Impact::Neutral,
            Severity::Medium,
        ),
        AlertLevel::Exceeded => (
            format!("{name} budget exceeded"),
            format!(
                "You have spent {} against a {} {name} budget, {} over.",
                format_amount(status.spent),
                format_amount(status.limit),
                format_amount(status.spent - status.limit),
            ),
            Impact::Negative,
            Severity::Critical,
        ),
    };

    Some(InsightItem {
        id: format!("budget-{}", status.category.as_str()),
        kind: InsightKind::Warning,
        title,
        description,
        impact,
        severity,
        category: Some(status.category),
        magnitude_percent: Some(status.utilization_percent()),
    })
}

/// Flag a category whose current-period spend exceeds the average of its
/// previous `lookback_periods` periods by more than the anomaly threshold.
fn anomaly_insight(series: &CategorySeries, config: &InsightConfig) -> Result<Option<InsightItem>> {
    let Some((current, prior)) = series.totals.split_last() else {
        return Ok(None);
    };
    let window = &prior[prior.len().saturating_sub(config.lookback_periods)..];
    if window.is_empty() {
        return Ok(None);
    }

    let baseline =
        checked_sum(window.iter().map(|p| p.total_amount))? / Decimal::from(window.len());
    if baseline <= Decimal::ZERO {
        return Ok(None);
    }

    // compared unrounded; only the reported figure is rounded
    let excess = unrounded_percent(current.total_amount - baseline, baseline)?;
    debug!(
        category = series.category.as_str(),
        baseline = %baseline,
        current = %current.total_amount,
        excess = %excess,
        "Anomaly check"
    );
    if excess <= config.anomaly_threshold_percent {
        return Ok(None);
    }

    let excess = round_percent(excess);
    let name = series.category.display_name();
    Ok(Some(InsightItem {
        id: format!("anomaly-{}", series.category.as_str()),
        kind: InsightKind::Anomaly,
        title: format!("Unusual spending in {name}"),
        description: format!(
            "Your {name} expenses in {} are {}% higher than your {}-period average of {}.",
            current.period_label,
            excess.round_dp(0),
            window.len(),
            format_amount(baseline),
        ),
        impact: Impact::Negative,
        severity: Severity::High,
        category: Some(series.category),
        magnitude_percent: Some(excess),
    }))
}

fn overall_trend_insight(trend: &TrendSignal, config: &InsightConfig) -> InsightItem {
    let magnitude = trend.delta_percent.map(|d| d.abs().normalize());
    let (title, description) = match trend.direction {
        TrendDirection::Increase => (
            "Spending increased".to_string(),
            match magnitude {
                Some(pct) => format!(
                    "You spent {pct}% more in {} than in {} ({} vs {}).",
                    trend.current_label,
                    trend.previous_label,
                    format_amount(trend.current_amount),
                    format_amount(trend.previous_amount),
                ),
                None => format!(
                    "You spent {} in {} after no spending in {}.",
                    format_amount(trend.current_amount),
                    trend.current_label,
                    trend.previous_label,
                ),
            },
        ),
        TrendDirection::Decrease => (
            "Spending decreased".to_string(),
            format!(
                "You spent {}% less in {} than in {} ({} vs {}).",
                magnitude.unwrap_or_default(),
                trend.current_label,
                trend.previous_label,
                format_amount(trend.current_amount),
                format_amount(trend.previous_amount),
            ),
        ),
        TrendDirection::Flat => (
            "Spending holding steady".to_string(),
            format!(
                "You spent the same in {} as in {}.",
                trend.current_label, trend.previous_label
            ),
        ),
    };

    InsightItem {
        id: "trend-overall".into(),
        kind: InsightKind::Trend,
        title,
        description,
        impact: impact_of(trend.direction),
        severity: trend_severity(trend, config),
        category: None,
        magnitude_percent: magnitude,
    }
}

/// Per-category movement; small changes and flat categories are skipped.
fn category_trend_insight(
    category: CategoryId,
    trend: &TrendSignal,
    config: &InsightConfig,
) -> Option<InsightItem> {
    if trend.direction == TrendDirection::Flat {
        return None;
    }
    let magnitude = trend.delta_percent.map(|d| d.abs().normalize());
    if magnitude.is_some_and(|m| m < config.trend_threshold_percent) {
        return None;
    }

    let name = category.display_name();
    let (title, description) = match (trend.direction, magnitude) {
        (TrendDirection::Decrease, Some(pct)) => (
            format!("Reduced {name} costs"),
            format!(
                "You spent {pct}% less on {name} in {} than in {}.",
                trend.current_label, trend.previous_label
            ),
        ),
        (_, Some(pct)) => (
            format!("Higher {name} costs"),
            format!(
                "You spent {pct}% more on {name} in {} than in {}.",
                trend.current_label, trend.previous_label
            ),
        ),
        (_, None) => (
            format!("New {name} spending"),
            format!(
                "You spent {} on {name} in {} after nothing in {}.",
                format_amount(trend.current_amount),
                trend.current_label,
                trend.previous_label
            ),
        ),
    };

    Some(InsightItem {
        id: format!("trend-{}", category.as_str()),
        kind: InsightKind::Trend,
        title,
        description,
        impact: impact_of(trend.direction),
        severity: trend_severity(trend, config),
        category: Some(category),
        magnitude_percent: magnitude,
    })
}

/// Informational note on the category holding the largest share.
fn top_category_insight(aggregates: &[CategoryAggregate]) -> Option<InsightItem> {
    if aggregates.len() < 2 {
        return None;
    }
    let top = aggregates
        .iter()
        .max_by(|a, b| {
            a.total_amount
                .cmp(&b.total_amount)
                .then(b.category.cmp(&a.category))
        })?;
    let name = top.category.display_name();

    Some(InsightItem {
        id: format!("share-{}", top.category.as_str()),
        kind: InsightKind::Trend,
        title: format!("{name} leads your spending"),
        description: format!(
            "{name} accounts for {}% of spending this period ({}).",
            top.share_of_total.round_dp(0),
            format_amount(top.total_amount),
        ),
        impact: Impact::Neutral,
        severity: Severity::Low,
        category: Some(top.category),
        magnitude_percent: Some(top.share_of_total),
    })
}

fn impact_of(direction: TrendDirection) -> Impact {
    match direction {
        TrendDirection::Increase => Impact::Negative,
        TrendDirection::Decrease => Impact::Positive,
        TrendDirection::Flat => Impact::Neutral,
    }
}

fn trend_severity(trend: &TrendSignal, config: &InsightConfig) -> Severity {
    match (trend.direction, trend.delta_percent) {
        (TrendDirection::Increase, None) => Severity::High,
        (TrendDirection::Increase, Some(d)) if d > config.anomaly_threshold_percent => Severity::High,
        (TrendDirection::Increase, Some(_)) => Severity::Medium,
        _ => Severity::Low,
    }
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod tests;
