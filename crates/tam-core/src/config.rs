//! Client configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so an absent or partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TamError};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";
pub const DEFAULT_ASSISTANT_NAME: &str = "Tam";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the chat service; `/chat` and `/new-chat` hang off it.
    pub endpoint: String,
    /// Name the assistant introduces itself with.
    pub assistant_name: String,
    /// Overrides the default location of the key-value storage file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<PathBuf>,
    /// Default tracing filter when `TAM_LOG` is unset.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            storage_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Rejects endpoints that are not absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(TamError::config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.assistant_name.trim().is_empty() {
            return Err(TamError::config("assistant_name must not be empty"));
        }
        Ok(())
    }

    pub fn chat_url(&self) -> String {
        self.join("chat")
    }

    pub fn new_chat_url(&self) -> String {
        self.join("new-chat")
    }

    fn join(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint.trim().trim_end_matches('/'), path)
    }
}
