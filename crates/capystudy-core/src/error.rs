//! Core error types for capystudy-core.
//!
//! Nothing in the application is fatal. Validation failures come back to the
//! caller as [`ValidationError`], storage failures are usually logged and
//! defaulted by the typed store helpers, and assistant failures are turned
//! into fallback text at the boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for capystudy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Language-model call errors
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors. Reported inline to the user; no state is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    /// Login identifier was blank
    #[error("Please enter a valid input")]
    EmptyIdentifier,

    /// Login email did not look like an email address
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Login phone contained characters other than digits, spaces, '-' and '+'
    #[error("Please enter a valid phone number")]
    InvalidPhone,
}

/// Failures of the language-model boundary.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No API key in the environment
    #[error("API key not found (set {env_var})")]
    MissingCredentials { env_var: String },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// Response carried no text candidate
    #[error("Response contained no text")]
    EmptyResponse,

    /// Endpoint could not be built
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Request payload could not be encoded
    #[error("Could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
