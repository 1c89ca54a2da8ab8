use crate::core::services::{CategoryClassifier, SummaryService};
use crate::domain::category::CategoryKind;
use crate::domain::report::Totals;
use crate::domain::transaction::Transaction;

fn classifier() -> CategoryClassifier {
    CategoryClassifier::from_names(["Salary"])
}

fn history() -> Vec<Transaction> {
    vec![
        Transaction::new("2023-03-01", "Payroll", 1000.0, "Salary"),
        Transaction::new("2023-03-02", "Landlord", -500.0, "Rent"),
        Transaction::new("2024-02-01", "Payroll", 2000.0, "Salary"),
        Transaction::new("2024-02-02", "Landlord", -800.0, "Rent"),
        Transaction::new("2024-03-01", "Payroll", 2000.0, "Salary"),
        Transaction::new("2024-03-02", "Landlord", -1000.0, "Rent"),
        Transaction::new("2024-03-03", "Refund", 50.0, "Rent"),
    ]
}

#[test]
fn snapshot_compares_latest_month_with_neighbours() {
    let snapshot = SummaryService::snapshot(&history(), &classifier()).unwrap();

    assert_eq!(snapshot.month, "2024-03");
    assert_eq!(snapshot.previous_month.as_deref(), Some("2024-02"));
    assert_eq!(snapshot.same_month_last_year.as_deref(), Some("2023-03"));
    assert_eq!(snapshot.current, Totals::new(2000.0, 1000.0));
    assert_eq!(snapshot.previous, Totals::new(2000.0, 800.0));
    assert_eq!(snapshot.last_year, Totals::new(1000.0, 500.0));

    assert_eq!(snapshot.month_over_month.income, Some(0.0));
    assert_eq!(snapshot.month_over_month.expense, Some(25.0));
    assert_eq!(snapshot.year_over_year.income, Some(100.0));
    assert_eq!(snapshot.year_over_year.net, Some(100.0));
}

#[test]
fn deltas_are_none_without_baseline() {
    let txns = vec![Transaction::new("2024-03-01", "Payroll", 2000.0, "Salary")];
    let snapshot = SummaryService::snapshot(&txns, &classifier()).unwrap();
    assert_eq!(snapshot.previous_month, None);
    assert_eq!(snapshot.month_over_month.income, None);
    assert_eq!(snapshot.year_over_year.expense, None);
}

#[test]
fn snapshot_is_none_without_transactions() {
    assert!(SummaryService::snapshot(&[], &classifier()).is_none());
}

#[test]
fn snapshot_at_uses_closest_earlier_month() {
    let snapshot = SummaryService::snapshot_at(&history(), &classifier(), "2024-02");
    assert_eq!(snapshot.previous_month.as_deref(), Some("2023-03"));
    assert_eq!(snapshot.current.expense, 800.0);
}

#[test]
fn breakdown_splits_income_and_expense_slices() {
    let totals = SummaryService::category_totals(&history(), &classifier());
    let slices = SummaryService::expense_breakdown(&totals);

    assert_eq!(slices.len(), 2);
    let rent = slices
        .iter()
        .find(|slice| slice.kind == CategoryKind::Expense)
        .unwrap();
    assert_eq!(rent.label, "Rent Expense");
    assert_eq!(rent.value, 2300.0);
    let percent_sum: f64 = slices.iter().map(|slice| slice.percent).sum();
    assert!((percent_sum - 100.0).abs() < 1e-9);
}

#[test]
fn breakdown_of_nothing_is_empty() {
    let totals = vec![("Rent".to_string(), Totals::ZERO)];
    assert!(SummaryService::expense_breakdown(&totals).is_empty());
}

#[test]
fn month_series_has_twelve_points() {
    let series = SummaryService::category_month_series(&history(), "2024", "Rent");
    assert_eq!(series.len(), 12);
    assert_eq!(series[0], ("01".to_string(), 0.0));
    assert_eq!(series[1].1, 800.0);
    assert_eq!(series[2].1, 1050.0);
}

#[test]
fn month_series_reports_uncategorized_as_other() {
    let txns = vec![
        Transaction::new("2024-02-03", "Cash", -15.0, ""),
        Transaction::new("2024-02-09", "Cash", -5.0, ""),
        Transaction::new("2024-02-10", "Market", -30.0, "Groceries"),
    ];
    let series = SummaryService::category_month_series(&txns, "2024", "Other");
    assert_eq!(series[1], ("02".to_string(), 20.0));
    assert!(SummaryService::category_month_series(&txns, "2024", "")
        .iter()
        .all(|(_, value)| *value == 0.0));
}
