use chrono::{DateTime, NaiveDateTime, Utc};
use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::DashboardError;

const DEFAULT_DIR_NAME: &str = ".dashboard_core";
const HOME_ENV: &str = "DASHBOARD_CORE_HOME";
const WORKSPACE_DIR: &str = "workspaces";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

pub const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_TIMESTAMP_LEN: usize = 15;

/// Resolves the on-disk layout below the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.dashboard_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn workspace_dir_in(base: &Path) -> PathBuf {
        base.join(WORKSPACE_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_BACKUP_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }
}

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> Result<(), DashboardError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` to a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), DashboardError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Builds `<prefix>_<YYYYMMDD_HHMMSS>[_<note>].json`.
pub fn backup_file_name(prefix: &str, at: DateTime<Utc>, note: Option<&str>) -> String {
    let mut name = format!("{prefix}_{}", at.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(label) = sanitize_note(note) {
        name.push('_');
        name.push_str(&label);
    }
    name.push('.');
    name.push_str(BACKUP_EXTENSION);
    name
}

/// Timestamp encoded in a backup file name produced by [`backup_file_name`].
pub fn parse_backup_timestamp(prefix: &str, name: &str) -> Option<DateTime<Utc>> {
    let rest = name
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))?
        .strip_prefix(prefix)?
        .strip_prefix('_')?;
    let stamp = rest.get(..BACKUP_TIMESTAMP_LEN)?;
    let tail = &rest[BACKUP_TIMESTAMP_LEN..];
    if !(tail.is_empty() || tail.starts_with('_')) {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Lowercased note with whitespace, `-` and `.` collapsed into single dashes.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.')) && !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Lowercase slug used for file names: alphanumerics kept, runs of anything else become `-`.
pub fn canonical_name(name: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !slug.is_empty() && !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "workspace".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_names() {
        assert_eq!(canonical_name("My Budget 2024"), "my-budget-2024");
        assert_eq!(canonical_name("  --Home!! "), "home");
        assert_eq!(canonical_name("???"), "workspace");
    }

    #[test]
    fn backup_names_round_trip_their_timestamp() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let name = backup_file_name("household", at, Some("Before import!"));
        assert_eq!(name, "household_20240305_102030_before-import.json");
        assert_eq!(parse_backup_timestamp("household", &name), Some(at));
        assert_eq!(parse_backup_timestamp("other", &name), None);
        assert_eq!(parse_backup_timestamp("household", "household_notes.json"), None);
    }

    #[test]
    fn empty_notes_are_dropped() {
        assert_eq!(sanitize_note(Some("  ")), None);
        assert_eq!(sanitize_note(Some("!!")), None);
        assert_eq!(sanitize_note(None), None);
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        write_atomic(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!dir.path().join("nested").join("data.json.tmp").exists());
    }

    #[test]
    fn layout_nests_config_backups() {
        let base = PathBuf::from("/tmp/dash");
        assert_eq!(
            PathResolver::config_backup_dir_in(&base),
            PathBuf::from("/tmp/dash/config/backups")
        );
        assert_eq!(
            PathResolver::workspace_dir_in(&base),
            PathBuf::from("/tmp/dash/workspaces")
        );
    }
}
