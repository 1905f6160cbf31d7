use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::debug;

use super::{checked_sum, percent_of};
use crate::error::{AnalyticsError, Result};
use crate::models::{
    CategoryAggregate, CategoryId, CategorySeries, ExpenseRecord, MonthlyAggregate,
    PeriodGranularity, PeriodKey,
};

/// Sum of all record amounts.
pub fn grand_total<'a, I>(records: I) -> Result<Decimal>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    checked_sum(records.into_iter().map(|r| r.amount))
}

/// Group records by category with each group's share of the grand total.
///
/// Categories without expenses are omitted. Output is ordered by total
/// (largest first), ties broken by category order, so the result does not
/// depend on input order. Any invalid record fails the whole aggregation.
pub fn aggregate_by_category<'a, I>(records: I) -> Result<Vec<CategoryAggregate>>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut totals: HashMap<CategoryId, Decimal> = HashMap::new();
    let mut count = 0usize;

    for record in records {
        let category = record.validate()?;
        add_to(totals.entry(category).or_insert(Decimal::ZERO), record.amount)?;
        count += 1;
    }

    let grand = checked_sum(totals.values().copied())?;

    let mut aggregates = totals
        .into_iter()
        .map(|(category, total_amount)| -> Result<CategoryAggregate> {
            Ok(CategoryAggregate {
                category,
                total_amount,
                share_of_total: percent_of(total_amount, grand)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    aggregates.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then(a.category.cmp(&b.category))
    });

    debug!(
        records = count,
        categories = aggregates.len(),
        grand_total = %grand,
        "Aggregated by category"
    );
    Ok(aggregates)
}

/// Group records by a caller-supplied period key. The result is ordered
/// chronologically by period, whatever order the input records are in, and
/// only contains periods with at least one record.
pub fn aggregate_by_period<F>(records: &[ExpenseRecord], period_key: F) -> Result<Vec<MonthlyAggregate>>
where
    F: Fn(&ExpenseRecord) -> PeriodKey,
{
    let totals = period_totals(records, period_key)?;
    Ok(totals
        .into_iter()
        .map(|(key, total_amount)| to_aggregate(key, total_amount))
        .collect())
}

/// Like [`aggregate_by_period`] over a fixed granularity, but with a
/// contiguous period grid: periods without expenses between the first and
/// the last active period appear with a zero total.
pub fn aggregate_by_period_filled(
    records: &[ExpenseRecord],
    granularity: PeriodGranularity,
) -> Result<Vec<MonthlyAggregate>> {
    let totals = period_totals(records, |r| PeriodKey::containing(r.date, granularity))?;
    let grid = period_grid(totals.keys().copied());

    Ok(grid
        .into_iter()
        .map(|key| {
            let total = totals.get(&key).copied().unwrap_or(Decimal::ZERO);
            to_aggregate(key, total)
        })
        .collect())
}

/// Per-category period totals, every series aligned to the same contiguous
/// grid spanning all records. The last entry of each series is the latest
/// period in the collection, even when that category had no spend in it.
pub fn category_history(
    records: &[ExpenseRecord],
    granularity: PeriodGranularity,
) -> Result<Vec<CategorySeries>> {
    let mut by_category: BTreeMap<CategoryId, BTreeMap<PeriodKey, Decimal>> = BTreeMap::new();
    let mut keys = Vec::with_capacity(records.len());

    for record in records {
        let category = record.validate()?;
        let key = PeriodKey::containing(record.date, granularity);
        keys.push(key);
        let total = by_category
            .entry(category)
            .or_default()
            .entry(key)
            .or_insert(Decimal::ZERO);
        add_to(total, record.amount)?;
    }

    let grid = period_grid(keys);

    Ok(by_category
        .into_iter()
        .map(|(category, totals)| CategorySeries {
            category,
            totals: grid
                .iter()
                .map(|key| to_aggregate(*key, totals.get(key).copied().unwrap_or(Decimal::ZERO)))
                .collect(),
        })
        .collect())
}

/// Most recent period that has at least one record.
pub fn latest_period(records: &[ExpenseRecord], granularity: PeriodGranularity) -> Option<PeriodKey> {
    records
        .iter()
        .map(|r| PeriodKey::containing(r.date, granularity))
        .max()
}

/// Records dated inside `period`.
pub fn records_in_period(
    records: &[ExpenseRecord],
    period: PeriodKey,
) -> impl Iterator<Item = &ExpenseRecord> + '_ {
    records
        .iter()
        .filter(move |r| PeriodKey::containing(r.date, period.granularity) == period)
}

fn period_totals<F>(records: &[ExpenseRecord], period_key: F) -> Result<BTreeMap<PeriodKey, Decimal>>
where
    F: Fn(&ExpenseRecord) -> PeriodKey,
{
    let mut totals: BTreeMap<PeriodKey, Decimal> = BTreeMap::new();
    for record in records {
        record.validate()?;
        add_to(totals.entry(period_key(record)).or_insert(Decimal::ZERO), record.amount)?;
    }
    debug!(records = records.len(), periods = totals.len(), "Aggregated by period");
    Ok(totals)
}

fn add_to(total: &mut Decimal, amount: Decimal) -> Result<()> {
    *total = total
        .checked_add(amount)
        .ok_or(AnalyticsError::Overflow { what: "a total" })?;
    Ok(())
}

/// Every period from the earliest to the latest key, inclusive.
fn period_grid<I>(keys: I) -> Vec<PeriodKey>
where
    I: IntoIterator<Item = PeriodKey>,
{
    let mut keys = keys.into_iter();
    let Some(first) = keys.next() else {
        return Vec::new();
    };
    let (min, max) = keys.fold((first, first), |(lo, hi), k| (lo.min(k), hi.max(k)));

    let mut grid = vec![min];
    let mut current = min;
    while current < max {
        match current.next() {
            Some(next) if next > current => {
                grid.push(next);
                current = next;
            }
            _ => break,
        }
    }
    grid
}

fn to_aggregate(key: PeriodKey, total_amount: Decimal) -> MonthlyAggregate {
    MonthlyAggregate {
        period_label: key.label(),
        period_start: key.start,
        total_amount,
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
