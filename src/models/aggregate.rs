use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::CategoryId;

/// Spend for one category with its percentage share of the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAggregate {
    pub category: CategoryId,
    pub total_amount: Decimal,
    /// Percentage 0-100, rounded to 2 dp independently per category.
    pub share_of_total: Decimal,
}

/// Spend for one period. Named after the default monthly granularity but
/// used for weeks, quarters and years too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAggregate {
    pub period_label: String,
    pub period_start: NaiveDate,
    pub total_amount: Decimal,
}

/// Per-period totals for one category, aligned to a shared period grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySeries {
    pub category: CategoryId,
    pub totals: Vec<MonthlyAggregate>,
}

impl CategorySeries {
    pub fn current(&self) -> Option<&MonthlyAggregate> {
        self.totals.last()
    }
}
