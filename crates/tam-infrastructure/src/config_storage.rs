//! Config file storage.
//!
//! Loads [`ClientConfig`] from `~/.config/tam/config.toml` and applies
//! environment overrides on top. A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use tam_core::config::ClientConfig;
use tam_core::error::Result;

use crate::paths::TamPaths;

pub const ENV_ENDPOINT: &str = "TAM_ENDPOINT";
pub const ENV_ASSISTANT_NAME: &str = "TAM_ASSISTANT_NAME";
pub const ENV_STORAGE_FILE: &str = "TAM_STORAGE_FILE";

/// Storage for `config.toml`.
///
/// Responsibilities:
/// - Read and parse the TOML file into [`ClientConfig`]
/// - Layer `TAM_*` environment variables over the file values
/// - Write the default file on first run
///
/// Does NOT validate the result; callers run [`ClientConfig::validate`]
/// after their own overrides (CLI flags) are applied.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a ConfigStorage with the default path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: TamPaths::config_file()?,
        })
    }

    /// Creates a ConfigStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file (or defaults) and applies process environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Loads only the file, without environment overrides.
    pub fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes the default configuration if no file exists yet.
    ///
    /// Returns `true` if a file was created.
    pub fn ensure_file(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = toml::to_string_pretty(&ClientConfig::default())?;
        fs::write(&self.path, template)?;
        tracing::info!(path = %self.path.display(), "Created default config file");
        Ok(true)
    }
}

/// Applies `TAM_*` overrides using the given lookup. Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(endpoint) = non_empty(ENV_ENDPOINT) {
        config.endpoint = endpoint;
    }
    if let Some(name) = non_empty(ENV_ASSISTANT_NAME) {
        config.assistant_name = name;
    }
    if let Some(path) = non_empty(ENV_STORAGE_FILE) {
        config.storage_file = Some(PathBuf::from(path));
    }

    config
}
