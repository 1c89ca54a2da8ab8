//! Builds report tables: group subtotals, primary totals, savings ratios and
//! the cashflow reconciliation rows.
//!
//! The monthly, month-across-years and year-to-date tables differ only in their
//! columns and [`PeriodMode`]; all three go through [`AggregationService::compute_table`].

use std::collections::HashSet;

use tracing::debug;

use crate::core::services::calendar::{all_months_in_year, month_short_name};
use crate::core::services::classifier::CategoryClassifier;
use crate::core::services::group_service::GroupService;
use crate::core::services::grouping_service::{effective_category, GroupingService, PeriodMode};
use crate::core::services::ordering::reorder;
use crate::domain::category::{Category, Taxonomy};
use crate::domain::groups::{
    GroupConfig, CASHFLOW_GROUP, OTHER_EXPENSES_GROUP, OTHER_INCOME_GROUP,
};
use crate::domain::report::{
    percent_of, CategoryPeriodTotals, CategoryRow, GroupSection, PeriodColumn, SectionKind,
    Series, TableModel, Totals, TotalsBlock,
};
use crate::domain::transaction::Transaction;
use crate::domain::workspace::Workspace;

/// Borrowed view of everything a report is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub transactions: &'a [Transaction],
    pub taxonomy: &'a Taxonomy,
    pub groups: &'a GroupConfig,
}

impl<'a> ReportInput<'a> {
    pub fn new(
        transactions: &'a [Transaction],
        taxonomy: &'a Taxonomy,
        groups: &'a GroupConfig,
    ) -> Self {
        Self {
            transactions,
            taxonomy,
            groups,
        }
    }
}

impl<'a> From<&'a Workspace> for ReportInput<'a> {
    fn from(workspace: &'a Workspace) -> Self {
        Self::new(
            &workspace.transactions,
            &workspace.taxonomy,
            &workspace.groups,
        )
    }
}

/// Computes [`TableModel`]s from transactions, taxonomy and group configuration.
pub struct AggregationService;

impl AggregationService {
    /// Month columns `Jan` to `Dec` for one year.
    pub fn compute_monthly_table(input: ReportInput<'_>, year: &str) -> TableModel {
        let year = year.trim();
        let columns = all_months_in_year(input.transactions, year)
            .into_iter()
            .map(|month| PeriodColumn::new(format!("{year}-{month}"), month_short_name(&month)))
            .collect();
        Self::compute_table(
            input,
            format!("Monthly Data for Year {year}"),
            columns,
            &PeriodMode::Month,
        )
    }

    /// One column per year, each holding only the given calendar month.
    pub fn compute_yearly_by_month_table<S: AsRef<str>>(
        input: ReportInput<'_>,
        years: &[S],
        month: &str,
    ) -> TableModel {
        let mode = PeriodMode::MonthAcrossYears {
            month: month.to_string(),
        };
        Self::compute_table(
            input,
            format!(
                "Category by Month: All Years (Month {})",
                month_short_name(month)
            ),
            year_columns(years),
            &mode,
        )
    }

    /// One column per year, each holding January through the cutoff month.
    ///
    /// A cutoff that is not a month number selects nothing.
    pub fn compute_ytd_table<S: AsRef<str>>(
        input: ReportInput<'_>,
        years: &[S],
        cutoff_month: &str,
    ) -> TableModel {
        let cutoff = cutoff_month.trim().parse::<u32>().unwrap_or(0);
        Self::compute_table(
            input,
            format!(
                "YTD Comparison by Year (Jan-{})",
                month_short_name(cutoff_month)
            ),
            year_columns(years),
            &PeriodMode::YearToDate { cutoff },
        )
    }

    /// Shared table builder.
    pub fn compute_table(
        input: ReportInput<'_>,
        title: String,
        columns: Vec<PeriodColumn>,
        mode: &PeriodMode,
    ) -> TableModel {
        let categories = Self::ordered_categories(input);
        let names: Vec<&str> = categories.iter().map(|category| category.name.as_str()).collect();
        let keys: Vec<&str> = columns.iter().map(|column| column.key.as_str()).collect();
        let classifier = CategoryClassifier::from_categories(categories.iter());
        let totals =
            GroupingService::group_periods(input.transactions, &names, &classifier, mode, &keys);
        let partition = GroupService::resolve(&categories, input.groups);

        let mut sections = Vec::new();
        for members in &partition.groups {
            if let Some(section) =
                build_section(&members.name, SectionKind::Group, &members.categories, &totals, &keys)
            {
                sections.push(section);
            }
        }
        sections.extend(build_section(
            OTHER_INCOME_GROUP,
            SectionKind::OtherIncome,
            &partition.other_income,
            &totals,
            &keys,
        ));
        sections.extend(build_section(
            OTHER_EXPENSES_GROUP,
            SectionKind::OtherExpenses,
            &partition.other_expense,
            &totals,
            &keys,
        ));

        let primary: Vec<&Category> = partition.primary_categories().collect();
        let totals_block = primary_totals(&primary, &totals, &keys);

        let cashflow = build_section(
            CASHFLOW_GROUP,
            SectionKind::Cashflow,
            &partition.cashflow,
            &totals,
            &keys,
        );
        let cashflow_net = sum_series(keys.iter().map(|key| {
            partition
                .cashflow
                .iter()
                .map(|category| totals.cell(&category.name, key).net)
                .sum::<f64>()
        }));
        let net_after_cashflow = sum_series(
            totals_block
                .net_savings
                .cells
                .iter()
                .zip(&cashflow_net.cells)
                .map(|(net, cashflow)| net + cashflow),
        );
        // The denominator stays the primary (non-cashflow) income or expense.
        let base = &totals_block.total;
        let percent_saved_after_cashflow = Series::new(
            net_after_cashflow
                .cells
                .iter()
                .zip(&base.cells)
                .map(|(net, cell)| percent_of(*net, cell.income, cell.expense))
                .collect(),
            percent_of(
                net_after_cashflow.total,
                base.total.income,
                base.total.expense,
            ),
        );

        debug!(
            title = %title,
            columns = columns.len(),
            categories = categories.len(),
            sections = sections.len(),
            cashflow = partition.cashflow.len(),
            "computed report table"
        );

        TableModel {
            title,
            columns,
            sections,
            totals: totals_block,
            cashflow,
            cashflow_net,
            net_after_cashflow,
            percent_saved_after_cashflow,
        }
    }

    /// Taxonomy categories plus ad-hoc transaction categories, in display order.
    ///
    /// The stored global order is applied first, then income categories are
    /// moved ahead of expense categories without disturbing relative order.
    /// Names unknown to the taxonomy are typed by the classifier fallback.
    pub fn ordered_categories(input: ReportInput<'_>) -> Vec<Category> {
        let mut seen = HashSet::new();
        let all: Vec<&str> = input
            .taxonomy
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .chain(input.transactions.iter().map(effective_category))
            .filter(|name| seen.insert(*name))
            .collect();

        let classifier = CategoryClassifier::from_taxonomy(input.taxonomy);
        let resolved: Vec<Category> = reorder(&all, &input.groups.category_order)
            .into_iter()
            .map(|name| match input.taxonomy.find(&name) {
                Some(category) => category.clone(),
                None => {
                    let kind = classifier.classify(name.as_str());
                    Category::new(name, kind)
                }
            })
            .collect();

        let (income, expense): (Vec<Category>, Vec<Category>) =
            resolved.into_iter().partition(Category::is_income);
        income.into_iter().chain(expense).collect()
    }
}

fn year_columns<S: AsRef<str>>(years: &[S]) -> Vec<PeriodColumn> {
    years
        .iter()
        .map(|year| PeriodColumn::new(year.as_ref(), year.as_ref()))
        .collect()
}

/// Sums displayed cells so the total column always matches them.
fn sum_series(cells: impl Iterator<Item = f64>) -> Series<f64> {
    let cells: Vec<f64> = cells.collect();
    let total = cells.iter().sum();
    Series::new(cells, total)
}

fn sum_totals(cells: Vec<Totals>) -> Series<Totals> {
    let mut total = Totals::ZERO;
    for cell in &cells {
        total.accumulate(cell);
    }
    Series::new(cells, total)
}

fn build_section(
    name: &str,
    kind: SectionKind,
    categories: &[Category],
    totals: &CategoryPeriodTotals,
    keys: &[&str],
) -> Option<GroupSection> {
    if categories.is_empty() {
        return None;
    }
    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|category| {
            let Series { cells, total } =
                sum_totals(keys.iter().map(|key| totals.cell(&category.name, key)).collect());
            CategoryRow {
                category: category.clone(),
                cells,
                total,
            }
        })
        .collect();

    let cells = (0..keys.len())
        .map(|index| {
            let mut cell = Totals::ZERO;
            for row in &rows {
                cell.accumulate(&row.cells[index]);
            }
            cell
        })
        .collect();
    // Group total is the sum of each category's own total rather than of the subtotal cells.
    let mut total = Totals::ZERO;
    for row in &rows {
        total.accumulate(&row.total);
    }

    Some(GroupSection {
        name: name.to_string(),
        kind,
        rows,
        subtotal: Series::new(cells, total),
    })
}

fn primary_totals(
    categories: &[&Category],
    totals: &CategoryPeriodTotals,
    keys: &[&str],
) -> TotalsBlock {
    let total = sum_totals(
        keys.iter()
            .map(|key| {
                let mut income = 0.0;
                let mut expense = 0.0;
                for category in categories {
                    let cell = totals.cell(&category.name, key);
                    if category.is_income() {
                        income += cell.income;
                    } else {
                        expense += cell.expense;
                    }
                }
                Totals::new(income, expense)
            })
            .collect(),
    );
    let net_savings = sum_series(total.cells.iter().map(|cell| cell.net));
    let percent_saved = Series::new(
        total.cells.iter().map(Totals::percent_saved).collect(),
        total.total.percent_saved(),
    );
    TotalsBlock {
        total,
        net_savings,
        percent_saved,
    }
}
