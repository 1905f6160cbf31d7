mod aggregate;
mod budget;
mod category;
mod expense;
mod insight;
mod keyword_rule;
mod period;
mod trend;

pub use aggregate::{CategoryAggregate, CategorySeries, MonthlyAggregate};
pub use budget::{AlertLevel, BudgetLimits, BudgetStatus};
pub use category::CategoryId;
pub use expense::ExpenseRecord;
pub use insight::{Impact, InsightItem, InsightKind, Severity};
pub use keyword_rule::KeywordRule;
pub use period::{PeriodGranularity, PeriodKey};
pub use trend::{TrendDirection, TrendSignal};
