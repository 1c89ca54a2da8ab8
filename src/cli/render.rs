//! Plain-text rendering of report tables.

use colored::Colorize;

use crate::config::Config;
use crate::core::services::summary_service::{Deltas, SummarySnapshot};
use crate::domain::category::CategoryKind;
use crate::domain::groups::CASHFLOW_GROUP;
use crate::domain::report::{GroupSection, Series, TableModel, Totals};

/// Describes how a column aligns its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            header: header.into(),
            alignment,
        }
    }
}

/// Columns plus rows of pre-formatted cells. Widths ignore ANSI colour codes.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell))
                    .fold(visible_width(&column.header), usize::max)
            })
            .collect()
    }

    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let mut lines = vec![
            self.render_row(&header, &widths),
            horizontal_rule(&widths, self.padding),
        ];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Character count with ANSI escape sequences skipped.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for code in chars.by_ref() {
                if code.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let remaining = width.saturating_sub(visible_width(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    format!(
        "{}{}{}{}{}",
        " ".repeat(padding),
        " ".repeat(left),
        text,
        " ".repeat(right),
        " ".repeat(padding)
    )
}

pub fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    "-".repeat(total)
}

/// Grouping and decimal separators for a locale tag.
fn separators(locale: &str) -> (char, char) {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "id" | "da" => ('.', ','),
        _ => (',', '.'),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `value` as currency, e.g. `$1,234.50` or `-$12.00`.
pub fn format_currency(value: f64, config: &Config) -> String {
    let (grouping, decimal) = separators(&config.locale);
    let body = format!("{:.*}", config.decimals, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body.as_str(), None),
    };
    let mut formatted = String::new();
    // `-0.00` after rounding is shown unsigned.
    if value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        formatted.push('-');
    }
    formatted.push_str(&config.currency_symbol);
    formatted.push_str(&group_digits(int_part, grouping));
    if let Some(frac) = frac_part {
        formatted.push(decimal);
        formatted.push_str(frac);
    }
    formatted
}

/// `95.0%`, or `-` when the ratio is undefined.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(percent) => format!("{percent:.1}%"),
        None => "-".to_string(),
    }
}

struct Painter<'a> {
    config: &'a Config,
}

impl Painter<'_> {
    fn income(&self, value: f64) -> String {
        if value == 0.0 {
            return "-".into();
        }
        let text = format!("+{}", format_currency(value, self.config));
        if self.config.color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn expense(&self, value: f64) -> String {
        if value == 0.0 {
            return "-".into();
        }
        let text = format!("-{}", format_currency(value, self.config));
        if self.config.color {
            text.red().to_string()
        } else {
            text
        }
    }

    fn net(&self, value: f64) -> String {
        format!("= {}", format_currency(value, self.config))
    }

    fn both(&self, totals: &Totals) -> String {
        format!("{} {}", self.income(totals.income), self.expense(totals.expense))
    }

    fn heading(&self, text: &str) -> String {
        let text = format!("[{text}]");
        if self.config.color {
            text.bold().blue().to_string()
        } else {
            text
        }
    }

    fn label(&self, text: &str) -> String {
        if self.config.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

fn series_row<T>(label: String, series: &Series<T>, cell: impl Fn(&T) -> String) -> Vec<String> {
    let mut row = Vec::with_capacity(series.cells.len() + 2);
    row.push(label);
    row.extend(series.cells.iter().map(&cell));
    row.push(cell(&series.total));
    row
}

fn section_rows(section: &GroupSection, painter: &Painter<'_>, rows: &mut Vec<Vec<String>>) {
    rows.push(vec![painter.heading(&section.name)]);
    for row in &section.rows {
        let kind = row.category.kind;
        let cell = |totals: &Totals| match kind {
            CategoryKind::Income => painter.income(totals.income),
            CategoryKind::Expense => painter.expense(totals.expense),
        };
        let mut line = vec![row.category.name.clone()];
        line.extend(row.cells.iter().map(&cell));
        line.push(cell(&row.total));
        rows.push(line);
    }
    rows.push(series_row(painter.label("Sub-Total"), &section.subtotal, |totals| {
        painter.both(totals)
    }));
}

/// Renders a [`TableModel`] with sections, totals and cashflow reconciliation.
pub fn render_table(table: &TableModel, config: &Config) -> String {
    let painter = Painter { config };
    let mut columns = vec![TableColumn::new("Category", Alignment::Left)];
    columns.extend(
        table
            .columns
            .iter()
            .map(|column| TableColumn::new(column.label.clone(), Alignment::Right)),
    );
    columns.push(TableColumn::new("Total", Alignment::Right));

    let mut rows = Vec::new();
    for section in &table.sections {
        section_rows(section, &painter, &mut rows);
    }

    rows.push(series_row(painter.label("Total"), &table.totals.total, |totals| {
        painter.both(totals)
    }));
    rows.push(series_row(
        painter.label("Net Savings"),
        &table.totals.net_savings,
        |net| painter.net(*net),
    ));
    rows.push(series_row(
        painter.label("% Saved"),
        &table.totals.percent_saved,
        |percent| format_percent(*percent),
    ));

    if let Some(cashflow) = &table.cashflow {
        section_rows(cashflow, &painter, &mut rows);
        rows.push(series_row(
            painter.label(&format!("Net Savings after {CASHFLOW_GROUP}")),
            &table.net_after_cashflow,
            |net| painter.net(*net),
        ));
        rows.push(series_row(
            painter.label(&format!("% Saved after {CASHFLOW_GROUP}")),
            &table.percent_saved_after_cashflow,
            |percent| format_percent(*percent),
        ));
    }

    let body = Table {
        columns,
        rows,
        padding: 1,
    };
    format!("{}\n{}", painter.label(&table.title), body.render())
}

fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(value) => format!("{value:+.1}%"),
        None => "-".to_string(),
    }
}

/// Renders the dashboard header block.
pub fn render_summary(snapshot: &SummarySnapshot, config: &Config) -> String {
    let painter = Painter { config };
    let columns = vec![
        TableColumn::new("", Alignment::Left),
        TableColumn::new(snapshot.month.clone(), Alignment::Right),
        TableColumn::new("vs prev month", Alignment::Right),
        TableColumn::new("vs last year", Alignment::Right),
    ];
    let metric = |label: &str, value: String, pick: fn(&Deltas) -> Option<f64>| {
        vec![
            label.to_string(),
            value,
            format_delta(pick(&snapshot.month_over_month)),
            format_delta(pick(&snapshot.year_over_year)),
        ]
    };
    let rows = vec![
        metric(
            "Income",
            painter.income(snapshot.current.income),
            |deltas| deltas.income,
        ),
        metric(
            "Expenses",
            painter.expense(snapshot.current.expense),
            |deltas| deltas.expense,
        ),
        metric("Net", painter.net(snapshot.current.net), |deltas| deltas.net),
    ];
    let mut out = Table {
        columns,
        rows,
        padding: 1,
    }
    .render();
    let compared = [
        ("previous month", snapshot.previous_month.as_deref()),
        ("same month last year", snapshot.same_month_last_year.as_deref()),
    ];
    for (label, month) in compared {
        out.push_str(&format!("\n{label}: {}", month.unwrap_or("none")));
    }
    out
}
