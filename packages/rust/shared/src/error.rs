//! Error types for keypeople.
//!
//! Library crates use [`KeyPeopleError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all keypeople operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyPeopleError {
    /// Missing credentials/endpoints or a malformed config file.
    /// Raised before any network call is made.
    #[error("config error: {message}")]
    Config { message: String },

    /// Non-2xx HTTP response, transport failure, or request timeout
    /// from the graph or watchlist API. Never retried.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Expected JSON field missing or mismatched in an API response
    /// body. Indicates upstream contract drift; carries the offending
    /// JSON path.
    #[error("schema error at {path}: {message}")]
    Schema { path: String, message: String },

    /// Filesystem I/O error (report writing, config loading).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Local data validation error (bad CLI input, empty result set).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KeyPeopleError>;

impl KeyPeopleError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a schema error for a JSON path in an upstream response.
    pub fn schema(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
