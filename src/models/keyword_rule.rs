use serde::{Deserialize, Serialize};

use super::CategoryId;

/// One row of the classifier's ordered keyword table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub pattern: String,
    pub category: CategoryId,
    #[serde(default)]
    pub is_regex: bool,
}

impl KeywordRule {
    pub fn new_contains(pattern: impl Into<String>, category: CategoryId) -> Self {
        Self {
            pattern: pattern.into(),
            category,
            is_regex: false,
        }
    }

    pub fn new_regex(pattern: impl Into<String>, category: CategoryId) -> Self {
        Self {
            pattern: pattern.into(),
            category,
            is_regex: true,
        }
    }
}
