//! Schema analyzer.
//!
//! Introspects a database through a [`MetadataProvider`] and produces a
//! [`SchemaSnapshot`]. Failures on a single table are isolated: the table's
//! fields degrade to empty defaults and the remaining tables are still
//! analyzed.

use std::sync::Arc;

use super::types::{SchemaSnapshot, TableInfo};
use crate::config::{AnalysisSettings, NamingPatterns};
use crate::error::ErrorKind;
use crate::metadata::{MetadataProvider, ProviderError, ProviderResult};

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors raised while connecting or analyzing.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("database not found: {0}")]
    NotFound(String),

    #[error("connection failed: {0}")]
    Connection(#[source] ProviderError),

    #[error("schema analysis requires an established connection")]
    NotConnected,

    #[error("failed to enumerate tables: {0}")]
    ListTables(#[source] ProviderError),
}

impl AnalyzerError {
    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Connection(_) | Self::ListTables(_) => ErrorKind::ConnectionError,
            Self::NotConnected => ErrorKind::NotConnected,
        }
    }
}

impl From<ProviderError> for AnalyzerError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(locator) => Self::NotFound(locator),
            other => Self::Connection(other),
        }
    }
}

/// Connects to a database and builds schema snapshots.
///
/// # Example
///
/// ```ignore
/// use nlq::metadata::SqliteProvider;
/// use nlq::schema::SchemaAnalyzer;
///
/// let mut analyzer = SchemaAnalyzer::<SqliteProvider>::new(Default::default());
/// analyzer.connect("./hr.db")?;
/// let snapshot = analyzer.analyze()?;
/// ```
pub struct SchemaAnalyzer<P> {
    provider: Option<P>,
    patterns: Arc<NamingPatterns>,
    settings: AnalysisSettings,
}

impl<P: MetadataProvider> SchemaAnalyzer<P> {
    /// Create a disconnected analyzer.
    pub fn new(patterns: Arc<NamingPatterns>) -> Self {
        Self {
            provider: None,
            patterns,
            settings: AnalysisSettings::default(),
        }
    }

    /// Override the analysis settings.
    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Open a connection to the database at `locator`.
    ///
    /// Replaces any previous connection.
    pub fn connect(&mut self, locator: &str) -> AnalyzerResult<()> {
        match P::open(locator) {
            Ok(provider) => {
                self.provider = Some(provider);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to connect to database {}: {}", locator, e);
                Err(e.into())
            }
        }
    }

    /// Use an already open provider.
    pub fn attach(&mut self, provider: P) {
        self.provider = Some(provider);
    }

    /// Drop the connection, handing the provider back.
    pub fn disconnect(&mut self) -> Option<P> {
        self.provider.take()
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_some()
    }

    /// Introspect the connected database.
    pub fn analyze(&self) -> AnalyzerResult<SchemaSnapshot> {
        let provider = self.provider.as_ref().ok_or(AnalyzerError::NotConnected)?;
        analyze_provider(provider, &self.patterns, &self.settings)
    }
}

/// Introspect the database behind `provider`.
///
/// Only failing to enumerate tables is fatal.
pub fn analyze_provider<P: MetadataProvider + ?Sized>(
    provider: &P,
    patterns: &Arc<NamingPatterns>,
    settings: &AnalysisSettings,
) -> AnalyzerResult<SchemaSnapshot> {
    let table_names: Vec<String> = provider
        .list_tables()
        .map_err(AnalyzerError::ListTables)?
        .into_iter()
        .filter(|name| !is_system_table(name, &settings.system_table_prefix))
        .collect();

    log::info!("Found {} tables: {:?}", table_names.len(), table_names);

    let tables: Vec<TableInfo> = table_names
        .iter()
        .map(|name| analyze_table(provider, name, settings.sample_limit()))
        .collect();

    let snapshot = SchemaSnapshot::new(tables, Arc::clone(patterns), provider.storage_size_bytes());

    log::info!(
        "Schema analysis complete: {} tables, {} rows",
        snapshot.statistics().total_tables,
        snapshot.statistics().total_rows
    );

    Ok(snapshot)
}

fn is_system_table(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn analyze_table<P: MetadataProvider + ?Sized>(
    provider: &P,
    table: &str,
    sample_limit: usize,
) -> TableInfo {
    let columns = or_degrade(table, "column metadata", provider.describe_columns(table));
    let foreign_keys = or_degrade(table, "foreign keys", provider.list_foreign_keys(table));
    let sample_rows = or_degrade(table, "sample data", provider.sample_rows(table, sample_limit));
    let row_count = or_degrade(table, "row count", provider.row_count(table));

    TableInfo::new(table, columns, foreign_keys, sample_rows, row_count)
}

/// Unwrap a per-table fetch, falling back to the empty value on failure.
fn or_degrade<T: Default>(table: &str, what: &str, result: ProviderResult<T>) -> T {
    result.unwrap_or_else(|e| {
        log::warn!(
            "[{}] Could not fetch {} for {}: {}",
            ErrorKind::IntrospectionPartialFailure,
            what,
            table,
            e
        );
        T::default()
    })
}
