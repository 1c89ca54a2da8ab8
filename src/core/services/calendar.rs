//! Period discovery over a transaction list.

use std::collections::BTreeSet;

use crate::domain::transaction::Transaction;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The twelve canonical month codes `01` to `12`.
pub fn month_codes() -> Vec<String> {
    (1..=12).map(|month| format!("{month:02}")).collect()
}

/// Short English month name for a month code, or the code itself when it is not a month.
pub fn month_short_name(code: &str) -> String {
    code.trim()
        .parse::<usize>()
        .ok()
        .and_then(|month| month.checked_sub(1))
        .and_then(|index| MONTH_NAMES.get(index))
        .map(|name| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Distinct year prefixes of dated transactions, ascending.
pub fn all_years(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .filter(|txn| !txn.date.is_empty())
        .map(Transaction::year_prefix)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Month codes that have at least one transaction in `year`, ascending.
pub fn months_for_year(transactions: &[Transaction], year: &str) -> Vec<String> {
    transactions
        .iter()
        .filter(|txn| txn.year_prefix() == year)
        .map(|txn| txn.date.chars().skip(5).take(2).collect::<String>())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every canonical month code plus any other month segment found in `year`, ascending.
///
/// Years are compared numerically, so `"2024"` and `" 2024"` select the same records.
pub fn all_months_in_year(transactions: &[Transaction], year: &str) -> Vec<String> {
    let wanted = year.trim().parse::<i64>().ok();
    let mut months: BTreeSet<String> = month_codes().into_iter().collect();
    for txn in transactions {
        let Some((txn_year, month)) = txn.date_parts() else {
            continue;
        };
        if wanted.is_some() && txn_year.trim().parse::<i64>().ok() == wanted {
            months.insert(month.to_string());
        }
    }
    months.into_iter().collect()
}

pub fn latest_year(transactions: &[Transaction]) -> Option<String> {
    all_years(transactions).pop()
}

pub fn latest_month_in_year(transactions: &[Transaction], year: &str) -> Option<String> {
    months_for_year(transactions, year).pop()
}

/// Latest `YYYY-MM` month key present among dated transactions.
pub fn latest_month_key(transactions: &[Transaction]) -> Option<String> {
    transactions
        .iter()
        .filter(|txn| txn.is_reportable())
        .map(Transaction::month_key)
        .max()
}
