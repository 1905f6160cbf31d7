//! Plain-text rendering of analytics results for the terminal.

mod format;

use std::fmt::Write;

use crate::analytics::{BudgetSummary, Overview};
use crate::models::{
    AlertLevel, BudgetStatus, CategoryAggregate, ExpenseRecord, Impact, InsightItem,
    MonthlyAggregate, TrendDirection, TrendSignal,
};

pub use format::{format_amount, format_change, progress_bar, truncate};

const NAME_WIDTH: usize = 18;
const BAR_WIDTH: usize = 20;

pub fn render_overview(overview: &Overview) -> String {
    let mut out = String::new();
    let period = overview.period_label.as_deref().unwrap_or("No data");
    let _ = writeln!(out, "Period:     {period} ({} records)", overview.record_count);
    let _ = writeln!(out, "Spent:      {}", format_amount(overview.total_spent));
    if let Some(direction) = overview.trend {
        let _ = writeln!(
            out,
            "Change:     {} ({direction})",
            format_change(overview.change_percent)
        );
    }
    if !overview.budget.total_limit.is_zero() {
        let _ = writeln!(
            out,
            "Budget:     {} of {} left",
            format_amount(overview.budget.remaining),
            format_amount(overview.budget.total_limit)
        );
    }
    if let Some(top) = &overview.top_category {
        let _ = writeln!(
            out,
            "Top:        {} {} ({}%)",
            top.category,
            format_amount(top.total_amount),
            top.share_of_total.normalize()
        );
    }
    out
}

pub fn render_categories(aggregates: &[CategoryAggregate]) -> String {
    if aggregates.is_empty() {
        return "No expenses\n".to_string();
    }
    let mut out = String::new();
    for agg in aggregates {
        let name = truncate(agg.category.display_name(), NAME_WIDTH - 1);
        let _ = writeln!(
            out,
            "{name:<NAME_WIDTH$}{:>14}  {:>6}%",
            format_amount(agg.total_amount),
            agg.share_of_total
        );
    }
    out
}

pub fn render_periods(periods: &[MonthlyAggregate]) -> String {
    let mut out = String::new();
    for period in periods {
        let _ = writeln!(
            out,
            "{:<10}{:>14}",
            period.period_label,
            format_amount(period.total_amount)
        );
    }
    out
}

pub fn render_trend(signal: &TrendSignal) -> String {
    let arrow = match signal.direction {
        TrendDirection::Increase => "▲",
        TrendDirection::Decrease => "▼",
        TrendDirection::Flat => "=",
    };
    format!(
        "{arrow} {} {} vs {} {}: {} ({})\n",
        signal.current_label,
        format_amount(signal.current_amount),
        signal.previous_label,
        format_amount(signal.previous_amount),
        format_change(signal.delta_percent),
        signal.direction
    )
}

pub fn render_budgets(statuses: &[BudgetStatus], summary: &BudgetSummary) -> String {
    if statuses.is_empty() {
        return "No budgets configured\n".to_string();
    }
    let mut out = String::new();
    for status in statuses {
        let name = truncate(status.category.display_name(), NAME_WIDTH - 1);
        let marker = match status.alert_level {
            AlertLevel::Ok => "",
            AlertLevel::Warning => "  warning",
            AlertLevel::Exceeded => "  EXCEEDED",
        };
        let _ = writeln!(
            out,
            "{name:<NAME_WIDTH$}{}/{} {} {:.0}%{marker}",
            format_amount(status.spent),
            format_amount(status.limit),
            progress_bar(status.utilization, BAR_WIDTH),
            status.utilization_percent()
        );
    }
    let _ = writeln!(
        out,
        "\nTotal: {} of {} spent, {} remaining",
        format_amount(summary.total_spent),
        format_amount(summary.total_limit),
        format_amount(summary.remaining)
    );
    out
}

pub fn render_insights(items: &[InsightItem]) -> String {
    if items.is_empty() {
        return "No insights yet\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        let icon = match item.impact {
            Impact::Positive => "+",
            Impact::Negative => "!",
            Impact::Neutral => "·",
        };
        let _ = writeln!(out, "{icon} [{}] {}", item.kind.as_str(), item.title);
        let _ = writeln!(out, "    {}", item.description);
    }
    out
}

pub fn render_records<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut out = String::new();
    for record in records {
        let category = record
            .category
            .map(|c| c.display_name())
            .unwrap_or("Uncategorized");
        let _ = writeln!(
            out,
            "{}  {:<32}{:<NAME_WIDTH$}{:>12}",
            record.date.format("%Y-%m-%d"),
            truncate(&record.description, 31),
            truncate(category, NAME_WIDTH - 1),
            format_amount(record.amount)
        );
    }
    out
}

#[cfg(test)]
mod tests;
