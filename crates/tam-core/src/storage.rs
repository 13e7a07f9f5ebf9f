//! Client-side key-value storage.
//!
//! The client keeps exactly two keys: the JSON patient profile and the
//! optional patient id. Everything else lives on the server or in memory.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, TamError};

/// Key holding the JSON-serialized [`crate::patient::PatientProfile`].
pub const PATIENT_DATA_KEY: &str = "patientData";
/// Key holding the opaque patient id, when registration produced one.
pub const PATIENT_ID_KEY: &str = "patient_id";

/// String key-value store that outlives a single client run.
pub trait ClientStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| TamError::storage("in-memory storage lock poisoned"))
    }
}

impl ClientStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}
