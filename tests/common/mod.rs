#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use dashboard_core::{
    config::ConfigManager,
    core::services::GroupService,
    domain::{
        category::{Category, Taxonomy},
        groups::{GroupConfig, CASHFLOW_GROUP},
        transaction::Transaction,
        workspace::Workspace,
    },
    storage::{save_workspace_to_path, JsonStorage},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated storage and configuration managers sharing one data directory.
pub fn setup_test_env() -> (PathBuf, JsonStorage, ConfigManager) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage backend");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, storage, config_manager)
}

/// Two years of household data.
///
/// January 2024 has Salary 2000, Rent -100 and a cashflow loan payment of -500.
/// Rent sits in the `Housing` group; Salary and Groceries fall into the
/// pseudo-groups.
pub fn household_workspace() -> Workspace {
    let transactions = vec![
        Transaction::new("2023-01-05", "Landlord", -1000.0, "Rent"),
        Transaction::new("2023-01-10", "Payroll", 1800.0, "Salary"),
        Transaction::new("2023-03-12", "Market", -200.0, "Groceries"),
        Transaction::new("2024-01-05", "Landlord", -100.0, "Rent"),
        Transaction::new("2024-01-10", "Payroll", 2000.0, "Salary"),
        Transaction::new("2024-01-15", "Loan payment", -500.0, "Investment Loan"),
        Transaction::new("2024-02-03", "Market", -50.25, "Groceries"),
        Transaction::new("2024-02-10", "Payroll", 2000.0, "Salary"),
        Transaction::new("2024-03-08", "Market", -30.0, "Groceries"),
        Transaction::new("2024-03-10", "Payroll", 2000.0, "Salary"),
    ];
    let taxonomy = Taxonomy::new(vec![
        Category::income("Salary"),
        Category::expense("Rent"),
        Category::expense("Groceries"),
        Category::expense("Investment Loan"),
    ]);
    let mut groups = GroupConfig::default();
    GroupService::add_group(&mut groups, "Housing").expect("add housing group");
    GroupService::assign(&mut groups, "Rent", "Housing");
    GroupService::assign(&mut groups, "Investment Loan", CASHFLOW_GROUP);
    Workspace::new(transactions, taxonomy).with_groups(groups)
}

/// Writes `workspace` to a JSON file inside a fresh temp directory.
pub fn write_workspace_file(workspace: &Workspace) -> PathBuf {
    let path = temp_base().join("workspace.json");
    save_workspace_to_path(workspace, &path).expect("write workspace file");
    path
}
