mod common;

use assert_cmd::Command;
use common::{household_workspace, setup_test_env, temp_base, write_workspace_file};
use dashboard_core::storage::WorkspaceStorage;
use predicates::prelude::*;
use predicates::str::contains;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("dashboard_cli").unwrap();
    cmd.arg("--home").arg(temp_base()).arg("--no-color");
    cmd
}

#[test]
fn monthly_report_prints_totals_and_cashflow_rows() {
    let path = write_workspace_file(&household_workspace());
    cli()
        .arg("--workspace")
        .arg(&path)
        .args(["monthly", "--year", "2024"])
        .assert()
        .success()
        .stdout(contains("Monthly Data for Year 2024"))
        .stdout(contains("[Housing]"))
        .stdout(contains("-$100.00"))
        .stdout(contains("+$2,000.00"))
        .stdout(contains("95.0%"))
        .stdout(contains("Net Savings after Cashflow items"))
        .stdout(contains("= $1,400.00"))
        .stdout(contains("70.0%"));
}

#[test]
fn ytd_defaults_to_all_years() {
    let path = write_workspace_file(&household_workspace());
    cli()
        .arg("--workspace")
        .arg(&path)
        .args(["ytd", "--month", "3"])
        .assert()
        .success()
        .stdout(contains("YTD Comparison by Year (Jan-Mar)"))
        .stdout(contains("2023"))
        .stdout(contains("+$6,000.00"));
}

#[test]
fn history_uses_requested_years() {
    let path = write_workspace_file(&household_workspace());
    cli()
        .arg("--workspace")
        .arg(&path)
        .args(["history", "--month", "01", "--years", "2024"])
        .assert()
        .success()
        .stdout(contains("(Month Jan)"))
        .stdout(contains("-$1,000.00").not());
}

#[test]
fn years_and_months_list_periods() {
    let path = write_workspace_file(&household_workspace());
    cli()
        .arg("--workspace")
        .arg(&path)
        .arg("years")
        .assert()
        .success()
        .stdout("2023\n2024\n");
    cli()
        .arg("--workspace")
        .arg(&path)
        .args(["months", "--year", "2023"])
        .assert()
        .success()
        .stdout("01 Jan\n03 Mar\n");
}

#[test]
fn summary_reads_named_workspace_from_home() {
    let (base, storage, _config) = setup_test_env();
    storage.save(&household_workspace(), "family").unwrap();
    Command::cargo_bin("dashboard_cli")
        .unwrap()
        .arg("--home")
        .arg(&base)
        .args(["--no-color", "--name", "family", "summary"])
        .assert()
        .success()
        .stdout(contains("2024-03"))
        .stdout(contains("previous month: 2024-02"))
        .stdout(contains("Groceries Expense"));
}

#[test]
fn invalid_month_fails_with_message() {
    let path = write_workspace_file(&household_workspace());
    cli()
        .arg("--workspace")
        .arg(&path)
        .args(["history", "--month", "13"])
        .assert()
        .failure()
        .stderr(contains("Error: Invalid input"));
}

#[test]
fn missing_workspace_fails() {
    cli()
        .arg("years")
        .assert()
        .failure()
        .stderr(contains("--workspace"));
    cli()
        .args(["--name", "nobody", "years"])
        .assert()
        .failure()
        .stderr(contains("Workspace not found"));
}

#[test]
fn version_prints_build_metadata() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("dashboard_core {}", env!("CARGO_PKG_VERSION"))));
}
