use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::CategoryId;

/// Configured spending limit per category.
pub type BudgetLimits = BTreeMap<CategoryId, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Ok,
    Warning,
    Exceeded,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub category: CategoryId,
    pub limit: Decimal,
    pub spent: Decimal,
    /// `spent / limit`, unrounded.
    pub utilization: Decimal,
    pub alert_level: AlertLevel,
}

impl BudgetStatus {
    pub fn remaining(&self) -> Decimal {
        self.limit - self.spent
    }

    pub fn utilization_percent(&self) -> Decimal {
        (self.utilization * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}
