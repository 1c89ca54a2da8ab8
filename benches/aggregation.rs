use dashboard_core::core::services::{
    AggregationService, CategoryClassifier, GroupService, GroupingService, PeriodMode,
    ReportInput, SummaryService,
};
use dashboard_core::domain::{
    category::Taxonomy,
    groups::{GroupConfig, CASHFLOW_GROUP},
    transaction::Transaction,
    workspace::Workspace,
};
use dashboard_core::storage::{load_workspace_from_path, save_workspace_to_path};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

const EXPENSES: [&str; 6] = ["Groceries", "Rent", "Utilities", "Dining Out", "Transport", "Shopping"];

fn build_sample_workspace(txn_count: usize) -> Workspace {
    let mut transactions = Vec::with_capacity(txn_count);
    for idx in 0..txn_count {
        let year = 2020 + (idx % 5);
        let month = idx % 12 + 1;
        let day = idx % 28 + 1;
        let date = format!("{year}-{month:02}-{day:02}");
        if idx % 10 == 0 {
            transactions.push(Transaction::new(date, "Payroll", 3000.0, "Salary"));
        } else {
            let category = EXPENSES[idx % EXPENSES.len()];
            transactions.push(Transaction::new(
                date,
                "Card payment",
                -(10.0 + (idx % 90) as f64),
                category,
            ));
        }
    }

    let mut groups = GroupConfig::new(vec!["Living".into(), "Leisure".into()]);
    GroupService::assign(&mut groups, "Rent", "Living");
    GroupService::assign(&mut groups, "Utilities", "Living");
    GroupService::assign(&mut groups, "Dining Out", "Leisure");
    GroupService::assign(&mut groups, "Transport", CASHFLOW_GROUP);

    Workspace::new(transactions, Taxonomy::with_defaults()).with_groups(groups)
}

fn bench_grouping(c: &mut Criterion) {
    let workspace = build_sample_workspace(black_box(50_000));
    let classifier = CategoryClassifier::from_taxonomy(&workspace.taxonomy);

    c.bench_function("group_by_month_50k", |b| {
        b.iter(|| {
            let grouped = GroupingService::group::<&str>(
                &workspace.transactions,
                &[],
                &classifier,
                &PeriodMode::Month,
            );
            black_box(grouped);
        })
    });
}

fn bench_tables(c: &mut Criterion) {
    let workspace = build_sample_workspace(black_box(50_000));
    let years = ["2020", "2021", "2022", "2023", "2024"];

    c.bench_function("monthly_table_50k", |b| {
        b.iter(|| {
            let table =
                AggregationService::compute_monthly_table(ReportInput::from(&workspace), "2023");
            black_box(table);
        })
    });

    c.bench_function("ytd_table_50k", |b| {
        b.iter(|| {
            let table =
                AggregationService::compute_ytd_table(ReportInput::from(&workspace), &years, "06");
            black_box(table);
        })
    });

    c.bench_function("summary_snapshot_50k", |b| {
        let classifier = CategoryClassifier::from_taxonomy(&workspace.taxonomy);
        b.iter(|| {
            let snapshot = SummaryService::snapshot(&workspace.transactions, &classifier);
            black_box(snapshot);
        })
    });
}

fn bench_workspace_io(c: &mut Criterion) {
    let workspace = build_sample_workspace(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("workspace.json");

    c.bench_function("workspace_save_10k", |b| {
        b.iter(|| {
            save_workspace_to_path(&workspace, &file_path).expect("save workspace");
        })
    });

    save_workspace_to_path(&workspace, &file_path).expect("seed");

    c.bench_function("workspace_load_10k", |b| {
        b.iter(|| {
            let loaded = load_workspace_from_path(&file_path).expect("load workspace");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_grouping, bench_tables, bench_workspace_io);
criterion_main!(benches);
