use std::time::Duration;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::models::{CategoryId, ExpenseRecord, KeywordRule};

/// Deterministic keyword classifier. Rules are tried in table order and the
/// first match wins; descriptions nothing matches fall back to `Other`.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CompiledRule>,
    invalid_patterns: Vec<String>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: String,
    regex: Option<Regex>,
    category: CategoryId,
    is_regex: bool,
}

impl Classifier {
    pub fn new(rules: &[KeywordRule]) -> Self {
        let mut invalid_patterns = Vec::new();
        let compiled = rules
            .iter()
            .map(|r| {
                let regex = if r.is_regex {
                    match RegexBuilder::new(&r.pattern).case_insensitive(true).build() {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!(pattern = %r.pattern, error = %e, "Skipping invalid regex rule");
                            invalid_patterns.push(r.pattern.clone());
                            None
                        }
                    }
                } else {
                    None
                };
                CompiledRule {
                    pattern: r.pattern.to_lowercase(),
                    regex,
                    category: r.category,
                    is_regex: r.is_regex,
                }
            })
            .collect();

        Self {
            rules: compiled,
            invalid_patterns,
        }
    }

    /// Classifier over the built-in keyword table.
    pub fn with_default_rules() -> Self {
        Self::new(&default_rules())
    }

    /// Regex patterns that failed to compile and are never matched.
    pub fn invalid_patterns(&self) -> &[String] {
        &self.invalid_patterns
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Category of the first matching rule, if any.
    pub fn categorize(&self, description: &str) -> Option<CategoryId> {
        let desc_lower = description.to_lowercase();

        for rule in &self.rules {
            let matched = if rule.is_regex {
                rule.regex
                    .as_ref()
                    .is_some_and(|re| re.is_match(description))
            } else {
                desc_lower.contains(&rule.pattern)
            };

            if matched {
                return Some(rule.category);
            }
        }

        None
    }

    /// Total classification: any input, including the empty string, yields a
    /// category.
    pub fn classify(&self, description: &str) -> CategoryId {
        let category = self.categorize(description).unwrap_or(CategoryId::Other);
        debug!(description, category = category.as_str(), "Classified description");
        category
    }

    /// Classification behind an artificial pause, the way the dashboard
    /// simulates model inference. The result is identical to `classify`.
    pub fn classify_with_delay(&self, description: &str, delay: Duration) -> CategoryId {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.classify(description)
    }

    /// Fill in categories for records that have none; records that already
    /// carry a category are left alone.
    pub fn classify_batch(&self, records: &mut [ExpenseRecord]) {
        for record in records.iter_mut() {
            if record.category.is_none() {
                record.category = Some(self.classify(&record.description));
            }
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Built-in ordered keyword table. Order matters: "uber eats" must be tried
/// before "uber", and travel bookings before generic "book".
pub fn default_rules() -> Vec<KeywordRule> {
    use CategoryId::*;

    // (pattern, category, is_regex)
    const TABLE: &[(&str, CategoryId, bool)] = &[
        ("coffee", Food, false),
        ("restaurant", Food, false),
        ("cafe", Food, false),
        ("grocer", Food, false),
        ("uber eats", Food, false),
        ("uber", Transport, false),
        ("lyft", Transport, false),
        ("taxi", Transport, false),
        // word-bounded so "business" is not a bus ride
        (r"\b(bus|train|metro)\b", Transport, true),
        ("fuel", Transport, false),
        ("gas station", Transport, false),
        ("movie", Entertainment, false),
        ("concert", Entertainment, false),
        ("netflix", Entertainment, false),
        ("spotify", Entertainment, false),
        ("electric", Utilities, false),
        ("water bill", Utilities, false),
        ("internet", Utilities, false),
        ("phone bill", Utilities, false),
        ("amazon", Shopping, false),
        ("mall", Shopping, false),
        ("clothing", Shopping, false),
        ("pharmacy", Health, false),
        ("doctor", Health, false),
        ("dentist", Health, false),
        ("hotel", Travel, false),
        ("flight", Travel, false),
        ("airbnb", Travel, false),
        ("booking.com", Travel, false),
        ("tuition", Education, false),
        ("course", Education, false),
        ("book", Education, false),
    ];

    TABLE
        .iter()
        .map(|&(pattern, category, is_regex)| KeywordRule {
            pattern: pattern.to_string(),
            category,
            is_regex,
        })
        .collect()
}
