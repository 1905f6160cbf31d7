use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::debug;

use super::percent_of;
use crate::error::{AnalyticsError, Result};
use crate::models::{CategoryId, CategorySeries, MonthlyAggregate, TrendDirection, TrendSignal};

/// Compare the last period of a chronological series with the one before it.
///
/// Fails with `InsufficientData` for fewer than two periods. When the
/// previous period is zero the percentage is undefined and reported as
/// `None` (both zero counts as flat, 0%).
pub fn evaluate_trend(series: &[MonthlyAggregate]) -> Result<TrendSignal> {
    let [.., previous, current] = series else {
        return Err(AnalyticsError::InsufficientData {
            periods: series.len(),
        });
    };

    let prev = previous.total_amount;
    let last = current.total_amount;

    let direction = match last.cmp(&prev) {
        Ordering::Greater => TrendDirection::Increase,
        Ordering::Less => TrendDirection::Decrease,
        Ordering::Equal => TrendDirection::Flat,
    };

    let delta_percent = if prev.is_zero() {
        if last.is_zero() {
            Some(Decimal::ZERO)
        } else {
            None
        }
    } else {
        Some(percent_of(last - prev, prev)?)
    };

    debug!(
        previous = %previous.period_label,
        current = %current.period_label,
        direction = direction.as_str(),
        "Evaluated trend"
    );

    Ok(TrendSignal {
        direction,
        delta_percent,
        previous_label: previous.period_label.clone(),
        previous_amount: prev,
        current_label: current.period_label.clone(),
        current_amount: last,
    })
}

/// Trend of every category series with at least two periods.
pub fn evaluate_category_trends(history: &[CategorySeries]) -> Vec<(CategoryId, TrendSignal)> {
    history
        .iter()
        .filter_map(|series| {
            evaluate_trend(&series.totals)
                .ok()
                .map(|signal| (series.category, signal))
        })
        .collect()
}

#[cfg(test)]
#[path = "trend_tests.rs"]
mod tests;
