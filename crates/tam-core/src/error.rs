//! Error types for the Tam client.

use thiserror::Error;

/// A shared error type for the entire Tam client.
///
/// Variants are typed and structured; common library errors convert
/// automatically through `From`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TamError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Client storage error (key-value file layer)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chat endpoint answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a usable response (connect, transport, body decode)
    #[error("{0}")]
    Network(String),

    /// User-supplied data failed validation
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TamError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Validation error for the named field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TamError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TamError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TamError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TamError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for call sites that bubble up opaque errors
impl From<anyhow::Error> for TamError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, TamError>`.
pub type Result<T> = std::result::Result<T, TamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts_to_serialization() {
        let err: TamError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.is_serialization());
        assert!(err.to_string().starts_with("Serialization error: JSON"));
    }

    #[test]
    fn test_transport_errors() {
        let http = TamError::Http {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(http.to_string(), "HTTP 502: bad gateway");

        let net = TamError::network("connection refused");
        assert_eq!(net.to_string(), "connection refused");
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = TamError::validation("age", "must be a whole number");
        assert_eq!(err.to_string(), "Invalid age: must be a whole number");
    }
}
