//! Unified path management for tam's files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/tam/           # Config directory (XDG on Linux, platform default elsewhere)
//! ├── config.toml          # Client configuration
//! ├── storage.json         # Client key-value storage (patient profile, patient id)
//! └── logs/                # Rolling log files
//!     └── tam.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use tam_core::TamError;

const APP_DIR: &str = "tam";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for TamError {
    fn from(e: PathError) -> Self {
        TamError::config(e.to_string())
    }
}

pub struct TamPaths;

impl TamPaths {
    /// Returns the tam configuration directory (e.g. `~/.config/tam/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the client key-value storage file.
    pub fn storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("storage.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = TamPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("tam"));
    }

    #[test]
    fn test_files_live_under_config_dir() {
        let config_dir = TamPaths::config_dir().unwrap();

        let config_file = TamPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let storage_file = TamPaths::storage_file().unwrap();
        assert!(storage_file.ends_with("storage.json"));
        assert!(storage_file.starts_with(&config_dir));

        let logs_dir = TamPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(&config_dir));
    }
}
