use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::CategoryId;
use crate::error::{AnalyticsError, Result};

/// A single expense. Records are never edited in place: an edit builds a new
/// record with the same `id` and replaces the old one in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    pub id: String,
    /// Spent amount, always a non-negative value for a valid record.
    pub amount: Decimal,
    /// `None` until the user picks a category or the classifier fills it in.
    pub category: Option<CategoryId>,
    pub description: String,
    pub date: NaiveDate,
}

impl ExpenseRecord {
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        category: Option<CategoryId>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            category,
            description: description.into(),
            date,
        }
    }

    /// Return the record's category, or reject records that cannot be
    /// aggregated (negative amount, missing category).
    pub fn validate(&self) -> Result<CategoryId> {
        if self.amount < Decimal::ZERO {
            return Err(AnalyticsError::InvalidRecord {
                id: self.id.clone(),
                reason: format!("negative amount {}", self.amount),
            });
        }
        self.category.ok_or_else(|| AnalyticsError::InvalidRecord {
            id: self.id.clone(),
            reason: "missing category".into(),
        })
    }

    /// Copy of this record with a different category, keeping the same id.
    pub fn with_category(&self, category: CategoryId) -> Self {
        Self {
            category: Some(category),
            ..self.clone()
        }
    }
}
