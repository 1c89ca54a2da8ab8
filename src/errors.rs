use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for storage, configuration and input handling.
///
/// The reporting computations themselves are total and never produce this.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, DashboardError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] DashboardError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_storage() {
        let err: DashboardError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, DashboardError::StorageError(ref msg) if msg.contains("gone")));
    }

    #[test]
    fn cli_error_is_transparent_over_core() {
        let err = CliError::from(DashboardError::InvalidInput("year".into()));
        assert_eq!(err.to_string(), "Invalid input: year");
    }
}
