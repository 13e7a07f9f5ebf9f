pub mod chat;
pub mod config;
pub mod error;
pub mod patient;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::{Result, TamError};
