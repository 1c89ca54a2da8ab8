use chrono::Utc;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    core::utils::{
        backup_file_name, canonical_name, ensure_dir, parse_backup_timestamp, write_atomic,
        PathResolver, BACKUP_EXTENSION,
    },
    domain::{groups::CASHFLOW_GROUP, workspace::Workspace},
    errors::DashboardError,
};

use super::{Result, WorkspaceStorage};

const DEFAULT_RETENTION: usize = 5;

/// Stores each workspace as one pretty-printed JSON file with rotating backups.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    workspaces_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let workspaces_dir = PathResolver::workspace_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&workspaces_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            workspaces_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn workspace_path(&self, name: &str) -> PathBuf {
        self.workspaces_dir
            .join(format!("{}.{}", canonical_name(name), BACKUP_EXTENSION))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    /// Names of stored workspaces, sorted.
    pub fn list_workspaces(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.workspaces_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    /// Picks a file name that does not overwrite a backup taken in the same second.
    fn unique_backup_path(&self, name: &str, note: Option<&str>) -> PathBuf {
        let slug = canonical_name(name);
        let dir = self.backup_dir(name);
        let now = Utc::now();
        let mut path = dir.join(backup_file_name(&slug, now, note));
        let mut counter = 2;
        while path.exists() {
            let suffixed = match note {
                Some(note) if !note.trim().is_empty() => format!("{note} {counter}"),
                _ => counter.to_string(),
            };
            path = dir.join(backup_file_name(&slug, now, Some(&suffixed)));
            counter += 1;
        }
        path
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backup_dir(name))?;
        let backup_path = self.unique_backup_path(name, None);
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backup_path(name, entry)) {
                warn!(backup = %entry, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl WorkspaceStorage for JsonStorage {
    fn save(&self, workspace: &Workspace, name: &str) -> Result<()> {
        let path = self.workspace_path(name);
        self.backup_existing_file(name, &path)?;
        save_workspace_to_path(workspace, &path)?;
        info!(
            workspace = %canonical_name(name),
            transactions = workspace.transactions.len(),
            "saved workspace"
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Workspace> {
        let path = self.workspace_path(name);
        if !path.exists() {
            return Err(DashboardError::WorkspaceNotFound(name.to_string()));
        }
        let workspace = load_workspace_from_path(&path)?;
        for warning in workspace_warnings(&workspace) {
            warn!(workspace = %canonical_name(name), "{warning}");
        }
        info!(
            workspace = %canonical_name(name),
            transactions = workspace.transactions.len(),
            "loaded workspace"
        );
        Ok(workspace)
    }

    /// Backup file names, newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(taken_at) = parse_backup_timestamp(&slug, file_name) else {
                warn!(file = %file_name, "skipping unrecognised backup file");
                continue;
            };
            // Names only resolve to the second; the write time orders same-second backups.
            let written = fs::metadata(&path).and_then(|meta| meta.modified()).ok();
            entries.push((taken_at, written, file_name.to_string()));
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries.into_iter().map(|(_, _, name)| name).collect())
    }

    fn backup(&self, workspace: &Workspace, name: &str, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backup_dir(name))?;
        let path = self.unique_backup_path(name, note);
        let json = serde_json::to_string_pretty(workspace)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| DashboardError::StorageError("invalid backup file name".into()))?;
        info!(workspace = %canonical_name(name), backup = %file_name, "created backup");
        Ok(file_name)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Workspace> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(DashboardError::StorageError(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let workspace = load_workspace_from_path(&backup_path)?;
        save_workspace_to_path(&workspace, &self.workspace_path(name))?;
        info!(workspace = %canonical_name(name), backup = %backup_name, "restored backup");
        Ok(workspace)
    }
}

pub fn save_workspace_to_path(workspace: &Workspace, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(workspace)?;
    write_atomic(path, &json)
}

pub fn load_workspace_from_path(path: &Path) -> Result<Workspace> {
    let data = fs::read_to_string(path)?;
    let workspace: Workspace = serde_json::from_str(&data)?;
    Ok(workspace)
}

/// Inconsistencies that reports tolerate but a user may want to fix.
pub fn workspace_warnings(workspace: &Workspace) -> Vec<String> {
    let known: HashSet<&str> = workspace
        .taxonomy
        .categories
        .iter()
        .map(|category| category.name.as_str())
        .collect();
    let mut warnings = Vec::new();

    let mut unknown: Vec<&str> = workspace
        .transactions
        .iter()
        .map(|txn| txn.category.as_str())
        .filter(|category| !category.is_empty() && !known.contains(category))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    unknown.sort_unstable();
    for category in unknown {
        warnings.push(format!(
            "transactions reference category `{category}` missing from the taxonomy"
        ));
    }

    let undated = workspace
        .transactions
        .iter()
        .filter(|txn| !txn.is_reportable())
        .count();
    if undated > 0 {
        warnings.push(format!(
            "{undated} transaction(s) have no date or a non-finite amount and are left out of reports"
        ));
    }

    for (category, group) in &workspace.groups.assignments {
        if !group.is_empty() && group != CASHFLOW_GROUP && !workspace.groups.has_group(group) {
            warnings.push(format!(
                "category `{category}` is assigned to unknown group `{group}`"
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        category::{Category, Taxonomy},
        groups::GroupConfig,
        transaction::Transaction,
    };
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_workspace() -> Workspace {
        Workspace::new(
            vec![Transaction::new("2024-01-05", "Landlord", -100.0, "Rent")],
            Taxonomy::new(vec![Category::expense("Rent")]),
        )
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let workspace = sample_workspace();
        storage.save(&workspace, "Household").expect("save workspace");
        assert!(storage.workspace_path("household").exists());
        let loaded = storage.load("household").expect("load workspace");
        assert_eq!(loaded, workspace);
        assert_eq!(storage.list_workspaces().unwrap(), vec!["household"]);
    }

    #[test]
    fn loading_unknown_workspace_is_not_found() {
        let (storage, _guard) = storage_with_temp_dir();
        let err = storage.load("missing").unwrap_err();
        assert!(matches!(err, DashboardError::WorkspaceNotFound(_)));
    }

    #[test]
    fn backups_are_pruned_to_retention() {
        let (storage, _guard) = storage_with_temp_dir();
        let workspace = sample_workspace();
        for _ in 0..5 {
            storage
                .backup(&workspace, "family", Some("monthly"))
                .expect("create backup");
        }
        let backups = storage.list_backups("family").expect("list backups");
        assert_eq!(backups.len(), 3);
        assert!(backups.iter().all(|name| name.starts_with("family_")));
    }

    #[test]
    fn saving_over_existing_file_keeps_a_backup() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.save(&sample_workspace(), "family").unwrap();
        storage.save(&Workspace::default(), "family").unwrap();
        assert_eq!(storage.list_backups("family").unwrap().len(), 1);
    }

    #[test]
    fn restore_replaces_current_workspace() {
        let (storage, _guard) = storage_with_temp_dir();
        let original = sample_workspace();
        storage.save(&original, "family").unwrap();
        let name = storage.backup(&original, "family", None).unwrap();
        storage.save(&Workspace::default(), "family").unwrap();

        let restored = storage.restore("family", &name).unwrap();
        assert_eq!(restored, original);
        assert_eq!(storage.load("family").unwrap(), original);
        assert!(storage.restore("family", "family_nope.json").is_err());
    }

    #[test]
    fn warnings_flag_unknown_categories_and_groups() {
        let mut workspace = sample_workspace();
        workspace
            .transactions
            .push(Transaction::new("2024-01-06", "Gig", -5.0, "Freelance"));
        workspace
            .transactions
            .push(Transaction::new("", "Undated", -5.0, "Rent"));
        workspace.groups = GroupConfig::default();
        workspace
            .groups
            .assignments
            .insert("Rent".into(), "Ghost".into());

        let warnings = workspace_warnings(&workspace);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("Freelance"));
        assert!(warnings[2].contains("Ghost"));
    }
}
