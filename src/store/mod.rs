//! In-memory expense collection. Records are immutable values: an edit is a
//! [`ExpenseStore::replace`] with a new record carrying the same id.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::models::{CategoryId, ExpenseRecord};

#[derive(Debug, Clone, Default)]
pub struct ExpenseStore {
    records: Vec<ExpenseRecord>,
    next_seq: u64,
}

/// Criteria for [`ExpenseStore::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    /// The dashboard's "recent transactions" preview.
    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn matches(&self, record: &ExpenseRecord, search_lower: Option<&str>) -> bool {
        if let Some(needle) = search_lower {
            if !record.description.to_lowercase().contains(needle) {
                return false;
            }
        }
        if self.category.is_some() && record.category != self.category {
            return false;
        }
        if self.from.is_some_and(|from| record.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.date > to) {
            return false;
        }
        true
    }
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-loaded records, failing on the first
    /// duplicate or invalid record.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = ExpenseRecord>,
    {
        let mut store = Self::new();
        for record in records {
            store.add(record)?;
        }
        Ok(store)
    }

    pub fn add(&mut self, record: ExpenseRecord) -> Result<()> {
        check_record(&record)?;
        if self.get(&record.id).is_some() {
            return Err(AnalyticsError::DuplicateRecord { id: record.id });
        }
        debug!(id = %record.id, amount = %record.amount, "Added expense");
        self.records.push(record);
        Ok(())
    }

    /// Swap in a new version of an existing record, returning the old one.
    pub fn replace(&mut self, record: ExpenseRecord) -> Result<ExpenseRecord> {
        check_record(&record)?;
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| AnalyticsError::RecordNotFound {
                id: record.id.clone(),
            })?;
        debug!(id = %record.id, "Replaced expense");
        Ok(std::mem::replace(slot, record))
    }

    pub fn remove(&mut self, id: &str) -> Result<ExpenseRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AnalyticsError::RecordNotFound { id: id.to_string() })?;
        debug!(id, "Removed expense");
        Ok(self.records.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&ExpenseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matching records, newest first. Records on the same date keep the
    /// most recently added one first.
    pub fn filter(&self, filter: &ExpenseFilter) -> Vec<&ExpenseRecord> {
        let search_lower = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<(usize, &ExpenseRecord)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r, search_lower.as_deref()))
            .collect();
        matched.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));

        let limit = filter.limit.unwrap_or(usize::MAX);
        matched.into_iter().take(limit).map(|(_, r)| r).collect()
    }

    /// A fresh `exp-<n>` id not used by any record in the store.
    pub fn next_id(&mut self) -> String {
        loop {
            self.next_seq += 1;
            let id = format!("exp-{}", self.next_seq);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

fn check_record(record: &ExpenseRecord) -> Result<()> {
    if record.id.trim().is_empty() {
        return Err(AnalyticsError::InvalidRecord {
            id: record.id.clone(),
            reason: "empty id".into(),
        });
    }
    if record.amount < Decimal::ZERO {
        return Err(AnalyticsError::InvalidRecord {
            id: record.id.clone(),
            reason: format!("negative amount {}", record.amount),
        });
    }
    Ok(())
}
