//! Expense analytics: pure computations over a collection of expense records.
//!
//! Nothing here caches derived values. Every aggregate, trend, budget status
//! and insight is recomputed from the records passed in, so results can never
//! go stale when the record collection changes.
//!
//! Flow: records → [`aggregate`] → [`trend`] / [`budget`] → [`insights`].
//! [`engine::AnalyticsEngine`] wires the steps together with configuration.

pub mod aggregate;
pub mod budget;
pub mod engine;
pub mod insights;
pub mod overview;
pub mod trend;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AnalyticsError, Result};

pub use aggregate::{
    aggregate_by_category, aggregate_by_period, aggregate_by_period_filled, category_history,
    grand_total, latest_period, records_in_period,
};
pub use budget::{evaluate_budget, evaluate_budgets, summarize_budgets, BudgetSummary};
pub use engine::{AnalyticsEngine, DashboardReport};
pub use insights::{generate_insights, InsightInputs};
pub use overview::{overview, Overview};
pub use trend::{evaluate_category_trends, evaluate_trend};

/// Round a percentage to 2 dp, halves away from zero.
pub(crate) fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole * 100` rounded to 2 dp, or zero when `whole` is zero.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    unrounded_percent(part, whole).map(round_percent)
}

/// `part / whole * 100` at full precision. Divides first, so it only fails
/// when the percentage itself is out of range.
pub(crate) fn unrounded_percent(part: Decimal, whole: Decimal) -> Result<Decimal> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(AnalyticsError::Overflow { what: "a percentage" })
}

/// Sum that fails instead of panicking past `Decimal::MAX`.
pub(crate) fn checked_sum<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or(AnalyticsError::Overflow { what: "a total" })
    })
}
