use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::core::utils::{
    backup_file_name, ensure_dir, parse_backup_timestamp, write_atomic, PathResolver,
    BACKUP_EXTENSION,
};
use crate::errors::DashboardError;

const BACKUP_PREFIX: &str = "config";

/// Report shown when no subcommand picks one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Monthly,
    History,
    Ytd,
    Summary,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            View::Monthly => "monthly",
            View::History => "history",
            View::Ytd => "ytd",
            View::Summary => "summary",
        };
        f.write_str(label)
    }
}

/// User display preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub decimals: usize,
    pub locale: String,
    pub color: bool,
    pub default_view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_workspace: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            decimals: 2,
            locale: "en-US".into(),
            color: true,
            default_view: View::Monthly,
            last_workspace: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, DashboardError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, DashboardError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, DashboardError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    /// Reads the stored configuration, falling back to defaults when none exists.
    pub fn load(&self) -> Result<Config, DashboardError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            DashboardError::ConfigError(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), DashboardError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    /// Writes a timestamped copy of `config` and returns the backup file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, DashboardError> {
        ensure_dir(&self.backups_dir)?;
        let name = backup_file_name(BACKUP_PREFIX, Utc::now(), note);
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        info!(backup = %name, "created configuration backup");
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, DashboardError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(DashboardError::ConfigError(format!(
                "configuration backup `{backup_name}` not found"
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&data)
            .map_err(|err| DashboardError::ConfigError(format!("{backup_name}: {err}")))?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, DashboardError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if parse_backup_timestamp(BACKUP_PREFIX, name).is_none() {
                warn!(file = %name, "skipping unrecognised configuration backup");
                continue;
            }
            entries.push(name.to_string());
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(BACKUP_PREFIX, b)
                .cmp(&parse_backup_timestamp(BACKUP_PREFIX, a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (TempDir, ConfigManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, manager)
    }

    #[test]
    fn load_defaults_when_missing() {
        let (_dir, manager) = manager();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.decimals, 2);
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let (_dir, manager) = manager();
        let config = Config {
            currency_symbol: "€".into(),
            color: false,
            default_view: View::Ytd,
            last_workspace: Some("home".into()),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let (_dir, manager) = manager();
        fs::write(manager.path(), r#"{"color":false}"#).unwrap();
        let config = manager.load().unwrap();
        assert!(!config.color);
        assert_eq!(config.locale, "en-US");
    }

    #[test]
    fn corrupt_file_is_a_config_error() {
        let (_dir, manager) = manager();
        fs::write(manager.path(), "{not json").unwrap();
        assert!(matches!(
            manager.load().unwrap_err(),
            DashboardError::ConfigError(_)
        ));
    }

    #[test]
    fn backup_and_restore_round_trip() {
        let (_dir, manager) = manager();
        let config = Config {
            decimals: 0,
            ..Config::default()
        };
        let name = manager.backup(&config, Some("before change")).unwrap();
        assert!(name.ends_with("_before-change.json"));
        assert_eq!(manager.list_backups().unwrap(), vec![name.clone()]);

        let restored = manager.restore(&name).unwrap();
        assert_eq!(restored.decimals, 0);
        assert_eq!(manager.load().unwrap().decimals, 0);
        assert!(manager.restore("config_missing.json").is_err());
    }
}
