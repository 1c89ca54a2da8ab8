//! Dashboard header statistics and chart series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::services::calendar::month_codes;
use crate::core::services::classifier::CategoryClassifier;
use crate::core::services::grouping_service::{effective_category, GroupingService, PeriodMode};
use crate::domain::category::CategoryKind;
use crate::domain::report::{CategoryPeriodTotals, Totals};
use crate::domain::transaction::Transaction;

/// Percentage change of each metric against a baseline; `None` when the baseline is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deltas {
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub net: Option<f64>,
}

impl Deltas {
    pub fn between(current: &Totals, baseline: &Totals) -> Self {
        Self {
            income: percent_change(current.income, baseline.income),
            expense: percent_change(current.expense, baseline.expense),
            net: percent_change(current.net, baseline.net),
        }
    }
}

fn percent_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some((current - baseline) / baseline * 100.0)
    }
}

/// Latest month compared with the month before it and the same month a year earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySnapshot {
    pub month: String,
    pub previous_month: Option<String>,
    pub same_month_last_year: Option<String>,
    pub current: Totals,
    pub previous: Totals,
    pub last_year: Totals,
    pub month_over_month: Deltas,
    pub year_over_year: Deltas,
}

/// One pie slice: a category's income or expense share of all activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub label: String,
    pub category: String,
    pub kind: CategoryKind,
    pub value: f64,
    pub percent: f64,
}

/// Header statistics and chart data built on the shared accumulation rule.
pub struct SummaryService;

impl SummaryService {
    /// Snapshot for the latest month present in the data.
    pub fn snapshot(
        transactions: &[Transaction],
        classifier: &CategoryClassifier,
    ) -> Option<SummarySnapshot> {
        let grouped = Self::by_month(transactions, classifier);
        let latest = month_keys(&grouped).into_iter().next_back()?;
        Some(Self::build_snapshot(&grouped, latest))
    }

    /// Snapshot for a chosen `YYYY-MM` month; `previous_month` is the closest earlier month with data.
    pub fn snapshot_at(
        transactions: &[Transaction],
        classifier: &CategoryClassifier,
        month: &str,
    ) -> SummarySnapshot {
        let grouped = Self::by_month(transactions, classifier);
        Self::build_snapshot(&grouped, month.to_string())
    }

    /// Sum of every period per category, in category name order.
    pub fn category_totals(
        transactions: &[Transaction],
        classifier: &CategoryClassifier,
    ) -> Vec<(String, Totals)> {
        let grouped = GroupingService::group::<&str>(transactions, &[], classifier, &PeriodMode::Year);
        grouped
            .categories()
            .map(|category| {
                let mut total = Totals::ZERO;
                for (_, cell) in grouped.periods_of(category) {
                    total.accumulate(cell);
                }
                (category.to_string(), total)
            })
            .collect()
    }

    /// Income and expense slices for each category, skipping zero values.
    pub fn expense_breakdown(category_totals: &[(String, Totals)]) -> Vec<BreakdownSlice> {
        let mut slices = Vec::new();
        for (category, totals) in category_totals {
            if totals.income != 0.0 {
                slices.push(slice(category, CategoryKind::Income, totals.income));
            }
            if totals.expense != 0.0 {
                slices.push(slice(category, CategoryKind::Expense, totals.expense));
            }
        }
        let sum: f64 = slices.iter().map(|slice| slice.value).sum();
        if sum > 0.0 {
            for slice in &mut slices {
                slice.percent = slice.value / sum * 100.0;
            }
        }
        slices
    }

    /// Twelve `(MM, value)` points of absolute amounts for one category in one year.
    pub fn category_month_series(
        transactions: &[Transaction],
        year: &str,
        category: &str,
    ) -> Vec<(String, f64)> {
        let mut by_month: BTreeMap<String, f64> =
            month_codes().into_iter().map(|month| (month, 0.0)).collect();
        for txn in transactions {
            if !txn.is_reportable()
                || effective_category(txn) != category
                || txn.year_prefix() != year
            {
                continue;
            }
            let month: String = txn.date.chars().skip(5).take(2).collect();
            if let Some(value) = by_month.get_mut(&month) {
                *value += txn.amount.abs();
            }
        }
        by_month.into_iter().collect()
    }

    fn by_month(transactions: &[Transaction], classifier: &CategoryClassifier) -> CategoryPeriodTotals {
        GroupingService::group::<&str>(transactions, &[], classifier, &PeriodMode::Month)
    }

    fn build_snapshot(grouped: &CategoryPeriodTotals, month: String) -> SummarySnapshot {
        let months = month_keys(grouped);
        let previous_month = months
            .iter()
            .filter(|key| key.as_str() < month.as_str())
            .next_back()
            .cloned();
        let same_month_last_year = year_earlier(&month);

        let current = month_total(grouped, &month);
        let previous = previous_month
            .as_deref()
            .map(|key| month_total(grouped, key))
            .unwrap_or(Totals::ZERO);
        let last_year = same_month_last_year
            .as_deref()
            .map(|key| month_total(grouped, key))
            .unwrap_or(Totals::ZERO);

        debug!(
            month = %month,
            previous = ?previous_month,
            last_year = ?same_month_last_year,
            "built summary snapshot"
        );

        SummarySnapshot {
            month_over_month: Deltas::between(&current, &previous),
            year_over_year: Deltas::between(&current, &last_year),
            month,
            previous_month,
            same_month_last_year,
            current,
            previous,
            last_year,
        }
    }
}

fn slice(category: &str, kind: CategoryKind, value: f64) -> BreakdownSlice {
    BreakdownSlice {
        label: format!("{category} {kind}"),
        category: category.to_string(),
        kind,
        value,
        percent: 0.0,
    }
}

fn month_keys(grouped: &CategoryPeriodTotals) -> Vec<String> {
    let mut keys: Vec<String> = grouped
        .categories()
        .flat_map(|category| grouped.periods_of(category).map(|(key, _)| key.to_string()))
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

fn month_total(grouped: &CategoryPeriodTotals, month: &str) -> Totals {
    let mut total = Totals::ZERO;
    for category in grouped.categories() {
        total.accumulate(&grouped.cell(category, month));
    }
    total
}

/// `YYYY-MM` of the same month one year earlier, when the key parses.
fn year_earlier(month: &str) -> Option<String> {
    let (year, month) = month.split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    if year == 0 || month == 0 {
        return None;
    }
    Some(format!("{:04}-{:02}", year - 1, month))
}
