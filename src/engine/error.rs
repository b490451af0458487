//! Error types for query sessions.

use crate::config::SettingsError;
use crate::error::ErrorKind;
use crate::metadata::ProviderError;
use crate::schema::AnalyzerError;

/// Result type for session operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by a query session.
///
/// SQL execution failures are not represented here: they are folded into a
/// failed [`ResultBundle`](super::ResultBundle).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl EngineError {
    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Analyzer(e) => e.kind(),
            Self::Settings(_) | Self::Task(_) => ErrorKind::ConnectionError,
        }
    }
}

impl From<ProviderError> for EngineError {
    fn from(err: ProviderError) -> Self {
        Self::Analyzer(err.into())
    }
}
