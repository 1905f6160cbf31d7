use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl PeriodGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "w" => Some(Self::Week),
            "month" | "monthly" | "m" => Some(Self::Month),
            "quarter" | "quarterly" | "q" => Some(Self::Quarter),
            "year" | "yearly" | "annual" | "y" => Some(Self::Year),
            _ => None,
        }
    }
}

impl std::fmt::Display for PeriodGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calendar period identified by its first day. Keys order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub start: NaiveDate,
    pub granularity: PeriodGranularity,
}

impl PeriodKey {
    /// The period of the given granularity that contains `date`.
    pub fn containing(date: NaiveDate, granularity: PeriodGranularity) -> Self {
        let start = match granularity {
            PeriodGranularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            PeriodGranularity::Month => date.with_day(1).unwrap_or(date),
            PeriodGranularity::Quarter => {
                let first_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
            }
            PeriodGranularity::Year => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
            }
        };
        Self { start, granularity }
    }

    pub fn month(date: NaiveDate) -> Self {
        Self::containing(date, PeriodGranularity::Month)
    }

    /// The following period, or `None` past the end of the calendar.
    pub fn next(&self) -> Option<Self> {
        let start = match self.granularity {
            PeriodGranularity::Week => self.start.checked_add_signed(Duration::days(7))?,
            PeriodGranularity::Month => self.start.checked_add_months(Months::new(1))?,
            PeriodGranularity::Quarter => self.start.checked_add_months(Months::new(3))?,
            PeriodGranularity::Year => self.start.checked_add_months(Months::new(12))?,
        };
        Some(Self {
            start,
            granularity: self.granularity,
        })
    }

    /// Display label: `2024-01`, `2024-W03`, `2024-Q1` or `2024`.
    pub fn label(&self) -> String {
        match self.granularity {
            PeriodGranularity::Week => {
                let week = self.start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            PeriodGranularity::Month => self.start.format("%Y-%m").to_string(),
            PeriodGranularity::Quarter => {
                format!("{}-Q{}", self.start.year(), self.start.month0() / 3 + 1)
            }
            PeriodGranularity::Year => self.start.year().to_string(),
        }
    }

    /// Parse a `YYYY-MM` month label.
    pub fn parse_month(label: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", label.trim()), "%Y-%m-%d").ok()?;
        Some(Self::month(date))
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
