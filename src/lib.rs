//! SpendLens: expense analytics over a collection of categorized expense
//! records. Classification, aggregation, trends, budget monitoring and
//! insight generation are pure functions of the records passed in.

pub mod analytics;
pub mod categorize;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod report;
pub mod store;

pub use analytics::AnalyticsEngine;
pub use config::Config;
pub use error::{AnalyticsError, Result};
pub use models::{CategoryId, ExpenseRecord};
