use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increase,
    Decrease,
    Flat,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Flat => "flat",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of the latest period against the one before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSignal {
    pub direction: TrendDirection,
    /// `None` when the previous period was zero and the percentage is undefined.
    pub delta_percent: Option<Decimal>,
    pub previous_label: String,
    pub previous_amount: Decimal,
    pub current_label: String,
    pub current_amount: Decimal,
}
