//! Error types for the analytics engine

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Insufficient data: trend needs at least 2 periods, got {periods}")]
    InsufficientData { periods: usize },

    #[error("Invalid budget limit {limit}: limit must be greater than zero")]
    InvalidLimit { limit: Decimal },

    #[error("Invalid expense record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Duplicate expense record id '{id}'")]
    DuplicateRecord { id: String },

    #[error("Expense record not found: '{id}'")]
    RecordNotFound { id: String },

    #[error("Amounts too large to compute {what}")]
    Overflow { what: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
