use rust_decimal::Decimal;
use serde::Serialize;

use super::CategoryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Anomaly,
    Trend,
    Warning,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anomaly => "anomaly",
            Self::Trend => "trend",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// Ranking bucket. Lower variants sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Budget exceeded
    Critical,
    /// Spending anomaly or a large upward trend
    High,
    /// Budget nearing its limit or a modest upward trend
    Medium,
    /// Informational
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightItem {
    pub id: String,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude_percent: Option<Decimal>,
}
