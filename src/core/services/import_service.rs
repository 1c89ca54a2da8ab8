//! Validation of loosely-typed records before they reach the reporting core.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::common::Displayable;
use crate::domain::transaction::{ImportOutcome, RawTransaction, RecordIssue, Transaction};

/// Turns [`RawTransaction`]s into [`Transaction`]s, quarantining what cannot be used.
pub struct ImportService;

impl ImportService {
    /// Validates one record. Amounts may be JSON numbers or numeric strings.
    pub fn validate(raw: &RawTransaction) -> Result<Transaction, RecordIssue> {
        let date = raw.date.trim();
        if date.is_empty() {
            return Err(RecordIssue::MissingDate);
        }
        let amount = parse_amount(&raw.amount)?;
        Ok(Transaction::new(
            date,
            raw.description.trim(),
            amount,
            raw.category.as_deref().map(str::trim).unwrap_or_default(),
        ))
    }

    /// Validates a batch, keeping input order in both halves.
    pub fn partition(raws: &[RawTransaction]) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();
        for (index, raw) in raws.iter().enumerate() {
            match Self::validate(raw) {
                Ok(txn) => outcome.accepted.push(txn),
                Err(issue) => {
                    warn!(index, %issue, "quarantined imported record");
                    outcome.quarantined.push((index, issue));
                }
            }
        }
        debug!(
            accepted = outcome.accepted.len(),
            quarantined = outcome.quarantined.len(),
            "validated import batch"
        );
        outcome
    }

    /// Transactions that still need a category.
    pub fn uncategorized(transactions: &[Transaction]) -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|txn| txn.category.trim().is_empty())
            .collect()
    }

    /// Indices of accepted transactions whose date is not `YYYY-MM-DD`.
    ///
    /// Such dates are kept as-is; reports key them by their leading characters.
    pub fn date_warnings(transactions: &[Transaction]) -> Vec<usize> {
        transactions
            .iter()
            .enumerate()
            .filter(|(_, txn)| NaiveDate::parse_from_str(&txn.date, "%Y-%m-%d").is_err())
            .map(|(index, txn)| {
                debug!(index, transaction = %txn.display_label(), "date is not YYYY-MM-DD");
                index
            })
            .collect()
    }
}

fn parse_amount(value: &Value) -> Result<f64, RecordIssue> {
    let amount = match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| RecordIssue::NonNumericAmount(number.to_string()))?,
        Value::String(text) => text
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| RecordIssue::NonNumericAmount(text.clone()))?,
        other => return Err(RecordIssue::NonNumericAmount(other.to_string())),
    };
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(RecordIssue::NonFiniteAmount)
    }
}
