//! Transaction records as seen by the reporting core and by importers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::common::Displayable;

/// A dated, categorised amount.
///
/// The sign of `amount` is not authoritative: the category's type decides whether
/// a transaction counts as income or expense. `date` is expected as `YYYY-MM-DD`
/// but malformed strings are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    /// Returns `true` when the record can take part in aggregation.
    pub fn is_reportable(&self) -> bool {
        !self.date.is_empty() && self.amount.is_finite()
    }

    /// First seven characters of the date (`YYYY-MM` for well-formed dates).
    pub fn month_key(&self) -> String {
        self.date.chars().take(7).collect()
    }

    /// First four characters of the date.
    pub fn year_prefix(&self) -> String {
        self.date.chars().take(4).collect()
    }

    /// Splits the date on `-` and returns its year and month segments.
    pub fn date_parts(&self) -> Option<(&str, &str)> {
        let mut parts = self.date.split('-');
        let year = parts.next()?;
        let month = parts.next()?;
        Some((year, month))
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} [{}]",
            self.date, self.description, self.amount, self.category
        )
    }
}

/// Loosely-typed record handed over by an importer before validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RawTransaction {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default)]
    pub category: Option<String>,
}

impl RawTransaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<serde_json::Value>,
        category: Option<&str>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            category: category.map(str::to_string),
        }
    }
}

/// Why a raw record was kept out of the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordIssue {
    #[error("missing date")]
    MissingDate,
    #[error("amount `{0}` is not a number")]
    NonNumericAmount(String),
    #[error("amount is not finite")]
    NonFiniteAmount,
}

/// Result of validating a batch of raw records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    pub accepted: Vec<Transaction>,
    /// Input index and reason for each rejected record.
    pub quarantined: Vec<(usize, RecordIssue)>,
}

impl ImportOutcome {
    pub fn is_clean(&self) -> bool {
        self.quarantined.is_empty()
    }
}
