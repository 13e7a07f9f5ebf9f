//! File-backed client storage.

mod atomic_json;
mod file_storage;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use file_storage::FileClientStorage;
