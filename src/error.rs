//! Error kinds shared across the pipeline.
//!
//! Each layer has its own `thiserror` enum (`ProviderError`, `AnalyzerError`,
//! `EngineError`, ...). They all report an [`ErrorKind`] so callers can react
//! to the category of failure without matching on layer-specific variants.

use serde::Serialize;
use std::fmt;

/// Category of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The database locator does not resolve to an existing database.
    NotFound,
    /// A connection attempt failed for any other reason.
    ConnectionError,
    /// An operation was attempted before a successful connect.
    NotConnected,
    /// Metadata, sample or count fetch failed for a single table.
    ///
    /// Never fatal: the table's fields degrade to safe defaults.
    IntrospectionPartialFailure,
    /// No table met the relevance threshold.
    SynthesisUnresolved,
    /// The generated SQL failed to execute.
    ExecutionError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::ConnectionError => "connection_error",
            Self::NotConnected => "not_connected",
            Self::IntrospectionPartialFailure => "introspection_partial_failure",
            Self::SynthesisUnresolved => "synthesis_unresolved",
            Self::ExecutionError => "execution_error",
        };
        write!(f, "{}", s)
    }
}
