//! Provider-specific error types.

use thiserror::Error;

use crate::error::ErrorKind;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised by a database provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The locator does not point at an existing database.
    #[error("database not found: {0}")]
    NotFound(String),

    /// Opening the database failed.
    #[error("failed to connect to database '{locator}': {message}")]
    Connection { locator: String, message: String },

    /// A statement failed on an open connection.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A statement failed on a non-SQLite provider.
    #[error("query failed: {0}")]
    Query(String),
}

impl ProviderError {
    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Connection { .. } => ErrorKind::ConnectionError,
            Self::Sqlite(_) | Self::Query(_) => ErrorKind::ExecutionError,
        }
    }
}
