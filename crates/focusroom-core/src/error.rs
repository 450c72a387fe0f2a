//! Core error types for focusroom-core.
//!
//! The timer engine itself never fails: every adapter error is recovered with
//! a fallback. These types describe what the adapters and local storage can
//! report, so the engine can log them and the CLI can surface them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of an external collaborator (preference store, session log,
/// focus classifier).
///
/// Always transient from the engine's point of view.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The collaborator could not be reached or is not configured
    #[error("{service} unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// The collaborator answered but refused the request
    #[error("{service} rejected the request: {message}")]
    Rejected { service: String, message: String },

    /// The call did not complete in time
    #[error("{service} timed out after {timeout_secs}s")]
    Timeout { service: String, timeout_secs: u64 },

    /// The response could not be interpreted
    #[error("malformed response from {service}: {message}")]
    Malformed { service: String, message: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn unavailable(service: &str, message: impl Into<String>) -> Self {
        AdapterError::Unavailable {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn rejected(service: &str, message: impl Into<String>) -> Self {
        AdapterError::Rejected {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Unknown preference name
    #[error("Unknown preference '{0}'")]
    UnknownPreference(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_error_messages_name_the_service() {
        let err = AdapterError::unavailable("classifier", "no endpoint configured");
        assert_eq!(err.to_string(), "classifier unavailable: no endpoint configured");

        let err = AdapterError::rejected("classifier", "success=false");
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn database_error_converts_into_core_error() {
        let err: CoreError = DatabaseError::Locked.into();
        assert!(matches!(err, CoreError::Database(DatabaseError::Locked)));
    }

    #[test]
    fn core_error_covers_config_and_json_failures() {
        let err: CoreError = ConfigError::DataDir("/nowhere".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::DataDir(_))));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoreError = json.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn query_returned_no_rows_is_a_query_failure() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
