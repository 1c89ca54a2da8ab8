//! Aggregate structures produced by the reporting services.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

/// Income, expense and net for one bucket.
///
/// `income` and `expense` are absolute magnitudes. For buckets filled from
/// transactions `net` is always recomputed as `income - expense`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        income: 0.0,
        expense: 0.0,
        net: 0.0,
    };

    pub fn new(income: f64, expense: f64) -> Self {
        Self {
            income,
            expense,
            net: income - expense,
        }
    }

    pub fn add_income(&mut self, amount: f64) {
        self.income += amount;
        self.recompute();
    }

    pub fn add_expense(&mut self, amount: f64) {
        self.expense += amount;
        self.recompute();
    }

    /// Field-wise sum, used for subtotals across categories or periods.
    pub fn accumulate(&mut self, other: &Totals) {
        self.income += other.income;
        self.expense += other.expense;
        self.net += other.net;
    }

    /// `net / max(income, expense) * 100`, or `None` when both are zero.
    pub fn percent_saved(&self) -> Option<f64> {
        percent_of(self.net, self.income, self.expense)
    }

    fn recompute(&mut self) {
        self.net = self.income - self.expense;
    }
}

/// Savings ratio against the larger of income and expense, in percent.
pub fn percent_of(net: f64, income: f64, expense: f64) -> Option<f64> {
    let denominator = income.max(expense);
    if denominator == 0.0 {
        None
    } else {
        Some(net / denominator * 100.0)
    }
}

/// Per-category, per-period totals keyed by category name then period key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPeriodTotals {
    cells: BTreeMap<String, BTreeMap<String, Totals>>,
}

impl CategoryPeriodTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category with no periods yet.
    pub fn ensure_category(&mut self, category: &str) {
        self.cells.entry(category.to_string()).or_default();
    }

    pub fn cell_mut(&mut self, category: &str, period: &str) -> &mut Totals {
        self.cells
            .entry(category.to_string())
            .or_default()
            .entry(period.to_string())
            .or_default()
    }

    /// Totals for a cell; missing cells read as zero.
    pub fn cell(&self, category: &str, period: &str) -> Totals {
        self.cells
            .get(category)
            .and_then(|periods| periods.get(period))
            .copied()
            .unwrap_or(Totals::ZERO)
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.cells.contains_key(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn periods_of(&self, category: &str) -> impl Iterator<Item = (&str, &Totals)> {
        self.cells
            .get(category)
            .into_iter()
            .flat_map(|periods| periods.iter().map(|(key, totals)| (key.as_str(), totals)))
    }

    /// Inserts zero cells so every known category reports every given period.
    pub fn zero_fill<S: AsRef<str>>(&mut self, periods: &[S]) {
        for by_period in self.cells.values_mut() {
            for period in periods {
                by_period.entry(period.as_ref().to_string()).or_default();
            }
        }
    }

    /// Sum over the given periods of one category's cells.
    pub fn total_for<S: AsRef<str>>(&self, category: &str, periods: &[S]) -> Totals {
        let mut total = Totals::ZERO;
        for period in periods {
            total.accumulate(&self.cell(category, period.as_ref()));
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A column of a report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodColumn {
    /// Key matching the grouping engine's period keys.
    pub key: String,
    pub label: String,
}

impl PeriodColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// One value per column plus the row's grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series<T> {
    pub cells: Vec<T>,
    pub total: T,
}

impl<T> Series<T> {
    pub fn new(cells: Vec<T>, total: T) -> Self {
        Self { cells, total }
    }
}

/// A category line inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: Category,
    pub cells: Vec<Totals>,
    pub total: Totals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Group,
    OtherIncome,
    OtherExpenses,
    Cashflow,
}

/// A block of category rows with its subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSection {
    pub name: String,
    pub kind: SectionKind,
    pub rows: Vec<CategoryRow>,
    pub subtotal: Series<Totals>,
}

/// The primary "Total", "Net Savings" and "% Saved" rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsBlock {
    pub total: Series<Totals>,
    pub net_savings: Series<f64>,
    pub percent_saved: Series<Option<f64>>,
}

/// Presentation-neutral table handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableModel {
    pub title: String,
    pub columns: Vec<PeriodColumn>,
    /// Named groups followed by "Other Income" and "Other Expenses"; empty ones are omitted.
    pub sections: Vec<GroupSection>,
    pub totals: TotalsBlock,
    pub cashflow: Option<GroupSection>,
    /// Net of the cashflow categories per column; zeros when there are none.
    pub cashflow_net: Series<f64>,
    pub net_after_cashflow: Series<f64>,
    pub percent_saved_after_cashflow: Series<Option<f64>>,
}

impl TableModel {
    pub fn section(&self, name: &str) -> Option<&GroupSection> {
        self.sections
            .iter()
            .chain(self.cashflow.iter())
            .find(|section| section.name == name)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key == key)
    }
}
