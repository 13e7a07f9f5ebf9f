//! Key-value client storage backed by a single JSON file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tam_core::error::Result;
use tam_core::storage::ClientStorage;

use super::atomic_json::AtomicJsonFile;
use crate::paths::TamPaths;

type Items = BTreeMap<String, String>;

/// [`ClientStorage`] persisted as a flat JSON object of strings.
///
/// Every call goes to disk, so two clients pointed at the same file see
/// each other's writes on their next read.
pub struct FileClientStorage {
    file: AtomicJsonFile<Items>,
}

impl FileClientStorage {
    /// Creates storage at a custom path (tests, `storage_file` config).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Creates storage at the default location (`~/.config/tam/storage.json`).
    pub fn open_default() -> Result<Self> {
        Ok(Self::with_path(TamPaths::storage_file()?))
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl ClientStorage for FileClientStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.file.load()?.unwrap_or_default();
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.file.update(Items::new(), |items| {
            items.insert(key.to_string(), value.to_string());
            Ok(())
        })?;
        tracing::debug!(key, path = %self.file.path().display(), "Stored client item");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(Items::new(), |items| {
            items.remove(key);
            Ok(())
        })?;
        tracing::debug!(key, "Removed client item");
        Ok(())
    }
}
