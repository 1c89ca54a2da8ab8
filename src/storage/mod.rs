pub mod json_backend;

use std::path::Path;

use crate::{domain::workspace::Workspace, errors::DashboardError};

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Persistence port for workspaces. The reporting core never calls this; the
/// application loads a [`Workspace`], computes, and saves explicitly.
pub trait WorkspaceStorage: Send + Sync {
    fn save(&self, workspace: &Workspace, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Workspace>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, workspace: &Workspace, name: &str, note: Option<&str>) -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Workspace>;

    /// Ad-hoc file helpers; default implementations write plain JSON.
    fn save_to_path(&self, workspace: &Workspace, path: &Path) -> Result<()> {
        json_backend::save_workspace_to_path(workspace, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Workspace> {
        json_backend::load_workspace_from_path(path)
    }
}

pub use json_backend::{
    load_workspace_from_path, save_workspace_to_path, workspace_warnings, JsonStorage,
};
