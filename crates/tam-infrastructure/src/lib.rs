pub mod config_storage;
pub mod paths;
pub mod storage;

pub use config_storage::ConfigStorage;
pub use paths::TamPaths;
pub use storage::{AtomicJsonFile, FileClientStorage};
