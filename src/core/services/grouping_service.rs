//! Buckets transactions by category and period.

use std::fmt;

use tracing::debug;

use crate::core::services::classifier::CategoryClassifier;
use crate::domain::category::CategoryKind;
use crate::domain::groups::OTHER_CATEGORY;
use crate::domain::report::CategoryPeriodTotals;
use crate::domain::transaction::Transaction;

/// How a transaction's date maps onto a period key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodMode {
    /// `YYYY-MM`, the first seven characters of the date.
    Month,
    /// `YYYY`, the first four characters of the date.
    Year,
    /// Keyed by year, keeping only transactions whose month segment equals `month` exactly.
    MonthAcrossYears { month: String },
    /// Keyed by year, keeping months numerically at or before `cutoff`.
    YearToDate { cutoff: u32 },
}

impl PeriodMode {
    /// Period key for a transaction, or `None` when the mode filters it out.
    pub fn key_for(&self, txn: &Transaction) -> Option<String> {
        match self {
            PeriodMode::Month => Some(txn.month_key()),
            PeriodMode::Year => Some(txn.year_prefix()),
            PeriodMode::MonthAcrossYears { month } => {
                let (year, txn_month) = txn.date_parts()?;
                (txn_month == month).then(|| year.to_string())
            }
            PeriodMode::YearToDate { cutoff } => {
                let (year, txn_month) = txn.date_parts()?;
                let month = txn_month.trim().parse::<u32>().ok()?;
                (month <= *cutoff).then(|| year.to_string())
            }
        }
    }
}

impl fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodMode::Month => f.write_str("month"),
            PeriodMode::Year => f.write_str("year"),
            PeriodMode::MonthAcrossYears { month } => write!(f, "month {month} across years"),
            PeriodMode::YearToDate { cutoff } => write!(f, "year to date through {cutoff:02}"),
        }
    }
}

/// Category name a transaction is reported under.
pub fn effective_category(txn: &Transaction) -> &str {
    if txn.category.is_empty() {
        OTHER_CATEGORY
    } else {
        &txn.category
    }
}

/// Accumulates per-category, per-period totals.
pub struct GroupingService;

impl GroupingService {
    /// Groups transactions into category by period buckets.
    ///
    /// Every name in `category_names` is present in the result even without
    /// activity. Income categories accumulate `|amount|` as income; expense
    /// categories accumulate `|amount|` as expense only for negative amounts.
    /// Undated records and non-finite amounts are skipped.
    pub fn group<S: AsRef<str>>(
        transactions: &[Transaction],
        category_names: &[S],
        classifier: &CategoryClassifier,
        mode: &PeriodMode,
    ) -> CategoryPeriodTotals {
        let mut totals = CategoryPeriodTotals::new();
        for name in category_names {
            totals.ensure_category(name.as_ref());
        }

        let mut skipped = 0usize;
        let mut filtered = 0usize;
        for txn in transactions {
            if !txn.is_reportable() {
                skipped += 1;
                continue;
            }
            let Some(period) = mode.key_for(txn) else {
                filtered += 1;
                continue;
            };
            let category = effective_category(txn);
            let cell = totals.cell_mut(category, &period);
            match classifier.classify(category) {
                CategoryKind::Income => cell.add_income(txn.amount.abs()),
                CategoryKind::Expense if txn.amount < 0.0 => cell.add_expense(txn.amount.abs()),
                CategoryKind::Expense => {}
            }
        }

        debug!(
            mode = %mode,
            transactions = transactions.len(),
            skipped,
            filtered,
            "grouped transactions by category and period"
        );
        totals
    }

    /// Like [`GroupingService::group`], then zero-fills `periods` for every category.
    pub fn group_periods<S: AsRef<str>, P: AsRef<str>>(
        transactions: &[Transaction],
        category_names: &[S],
        classifier: &CategoryClassifier,
        mode: &PeriodMode,
        periods: &[P],
    ) -> CategoryPeriodTotals {
        let mut totals = Self::group(transactions, category_names, classifier, mode);
        totals.zero_fill(periods);
        totals
    }
}
