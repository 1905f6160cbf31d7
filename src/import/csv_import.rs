use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::categorize::Classifier;
use crate::error::AnalyticsError;
use crate::models::{CategoryId, ExpenseRecord};

/// Column layout of an expense CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvProfile {
    pub date_column: usize,
    pub description_column: usize,
    pub amount_column: usize,
    /// Empty or missing cells are auto-classified.
    pub category_column: Option<usize>,
    pub date_format: String,
    pub has_header: bool,
    pub skip_rows: usize,
    /// Bank exports list spending as negative amounts.
    pub negate_amounts: bool,
}

impl Default for CsvProfile {
    fn default() -> Self {
        Self {
            date_column: 0,
            description_column: 1,
            amount_column: 2,
            category_column: Some(3),
            date_format: "%Y-%m-%d".into(),
            has_header: true,
            skip_rows: 0,
            negate_amounts: false,
        }
    }
}

impl CsvProfile {
    /// Locate columns by header name, falling back to the default layout
    /// for any column that is not named.
    pub fn from_headers(headers: &[String]) -> Self {
        let h: Vec<String> = headers.iter().map(|s| s.trim().to_lowercase()).collect();
        let defaults = Self::default();

        let date_column = col_index(&h, &["date", "posted date", "transaction date"])
            .unwrap_or(defaults.date_column);
        let description_column = col_index(&h, &["description", "memo", "payee", "name"])
            .unwrap_or(defaults.description_column);
        let amount_column = col_index(&h, &["amount", "value"]).unwrap_or(defaults.amount_column);

        // An unnamed fourth column is only the category if nothing else claimed it
        let category_column = col_index(&h, &["category"]).or_else(|| {
            defaults.category_column.filter(|&c| {
                c < h.len() && ![date_column, description_column, amount_column].contains(&c)
            })
        });

        Self {
            date_column,
            description_column,
            amount_column,
            category_column,
            has_header: true,
            ..defaults
        }
    }
}

pub struct CsvImporter;

impl CsvImporter {
    /// Read the CSV and return headers + all rows as strings.
    pub fn preview(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Self::read_rows(rdr)
    }

    /// Same as [`CsvImporter::preview`] over in-memory CSV text.
    pub fn preview_str(data: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(data.as_bytes());
        Self::read_rows(rdr)
    }

    fn read_rows<R: std::io::Read>(
        mut rdr: csv::Reader<R>,
    ) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            all_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        let Some(first_row) = all_rows.first() else {
            anyhow::bail!("CSV file is empty");
        };

        // Headers don't parse as dates or numbers
        let looks_like_header = first_row.iter().all(|field| {
            let trimmed = field.trim();
            Decimal::from_str(trimmed.replace(['$', ','], "").trim()).is_err()
                && NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").is_err()
                && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err()
        });

        if looks_like_header {
            let headers = all_rows.remove(0);
            Ok((headers, all_rows))
        } else {
            Ok((Vec::new(), all_rows))
        }
    }

    /// Parse rows into expense records using the given profile. Empty
    /// category cells are filled in by `classifier`.
    pub fn parse(
        rows: &[Vec<String>],
        profile: &CsvProfile,
        classifier: &Classifier,
    ) -> Result<Vec<ExpenseRecord>> {
        let mut records = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut classified = 0usize;

        for (i, row) in rows.iter().enumerate().skip(profile.skip_rows) {
            // 1-based file line; the header row was split off by preview()
            let line = i + 1 + usize::from(profile.has_header);
            let date_str = cell(row, profile.date_column);
            if date_str.is_empty() {
                continue;
            }

            let date = parse_date(date_str, &profile.date_format)
                .with_context(|| format!("Row {line}: failed to parse date '{date_str}'"))?;
            let description = cell(row, profile.description_column).to_string();

            let mut amount = parse_decimal(cell(row, profile.amount_column))
                .with_context(|| format!("Row {line}: failed to parse amount"))?;
            if profile.negate_amounts {
                amount = -amount;
                if amount < Decimal::ZERO {
                    debug!(row = line, %amount, "Skipping credit row");
                    continue;
                }
            }

            let hash = compute_hash(&date.to_string(), &description, &amount);
            let n = seen.entry(hash.clone()).or_insert(0);
            *n += 1;
            let id = if *n == 1 { hash } else { format!("{hash}-{n}") };

            let category_text = profile
                .category_column
                .map(|c| cell(row, c))
                .unwrap_or("");
            let category = if category_text.is_empty() {
                classified += 1;
                classifier.classify(&description)
            } else {
                CategoryId::parse(category_text)
                    .ok_or_else(|| AnalyticsError::InvalidRecord {
                        id: id.clone(),
                        reason: format!("unknown category '{category_text}'"),
                    })
                    .with_context(|| format!("Row {line}: bad category"))?
            };

            if amount < Decimal::ZERO {
                return Err(AnalyticsError::InvalidRecord {
                    id,
                    reason: format!("negative amount {amount}"),
                })
                .with_context(|| format!("Row {line}: bad amount"));
            }

            records.push(ExpenseRecord::new(id, amount, Some(category), description, date));
        }

        debug!(records = records.len(), classified, "Parsed CSV rows");
        Ok(records)
    }

    /// Read a CSV file, detect its layout, and parse every row.
    pub fn load(path: &Path, classifier: &Classifier) -> Result<Vec<ExpenseRecord>> {
        let (headers, rows) = Self::preview(path)?;
        let records = Self::parse(&rows, &Self::profile_for(&headers), classifier)?;
        info!(path = %path.display(), records = records.len(), "Loaded expenses");
        Ok(records)
    }

    fn profile_for(headers: &[String]) -> CsvProfile {
        if headers.is_empty() {
            CsvProfile {
                has_header: false,
                ..CsvProfile::default()
            }
        } else {
            CsvProfile::from_headers(headers)
        }
    }
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|s| s.trim()).unwrap_or("")
}

fn col_index(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

fn parse_date(s: &str, fmt: &str) -> Result<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
        return Ok(d);
    }
    for fallback in &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fallback) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', ','], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_str(&cleaned.replace('"', "")))
        .with_context(|| format!("Failed to parse '{}' as decimal", s))
}

/// Stable record id from the row content. FNV-1a does not change between
/// Rust releases, unlike `DefaultHasher`.
fn compute_hash(date: &str, description: &str, amount: &Decimal) -> String {
    let input = format!("{date}|{description}|{amount}");
    let hash = fnv1a(input.as_bytes());
    format!("{hash:016x}")
}

fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
