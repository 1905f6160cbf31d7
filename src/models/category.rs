use serde::{Deserialize, Serialize};

/// Fixed set of spending categories. There is no dynamic category creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Shopping,
    Health,
    Education,
    Travel,
    Other,
}

impl CategoryId {
    /// Stable machine key, also used in config files and CSV input.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Shopping => "shopping",
            Self::Health => "health",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Transport => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Shopping => "Shopping",
            Self::Health => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::Other => "Other",
        }
    }

    /// Parse a key, display name or common alias (case-insensitive).
    /// Unknown text yields `None`; callers decide whether that is an error.
    pub fn parse(s: &str) -> Option<Self> {
        let category = match s.trim().to_lowercase().as_str() {
            "food" | "food & dining" | "dining" | "groceries" => Self::Food,
            "transport" | "transportation" => Self::Transport,
            "entertainment" => Self::Entertainment,
            "utilities" | "bills" => Self::Utilities,
            "shopping" => Self::Shopping,
            "health" | "healthcare" => Self::Health,
            "education" => Self::Education,
            "travel" => Self::Travel,
            "other" => Self::Other,
            _ => return None,
        };
        Some(category)
    }

    pub fn all() -> &'static [CategoryId] {
        &[
            Self::Food,
            Self::Transport,
            Self::Entertainment,
            Self::Utilities,
            Self::Shopping,
            Self::Health,
            Self::Education,
            Self::Travel,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
