//! MetadataProvider trait definition.
//!
//! The MetadataProvider trait abstracts over the relational database the
//! pipeline talks to: structural introspection for the schema analyzer and
//! statement execution for the query session. The bundled implementation is
//! [`SqliteProvider`](super::SqliteProvider).
//!
//! All methods block. Async callers run them on tokio's blocking pool (see
//! [`QuerySession`](crate::engine::QuerySession)).

use super::error::ProviderResult;
use super::types::{ColumnMetadata, ForeignKeyRef, Interrupter, Row};
use crate::sql::Dialect;

/// Trait for introspecting and querying a relational database.
///
/// # Example
///
/// ```ignore
/// use nlq::metadata::{MetadataProvider, SqliteProvider};
///
/// let provider = SqliteProvider::open("./hr.db")?;
/// for table in provider.list_tables()? {
///     let columns = provider.describe_columns(&table)?;
///     let rows = provider.row_count(&table)?;
/// }
/// ```
pub trait MetadataProvider: Send {
    /// Open a connection.
    ///
    /// Fails with `ProviderError::NotFound` when the locator does not resolve
    /// to an existing database, `ProviderError::Connection` otherwise.
    fn open(locator: &str) -> ProviderResult<Self>
    where
        Self: Sized;

    // =========================================================================
    // Introspection
    // =========================================================================

    /// List every table, engine-internal ones included, in discovery order.
    fn list_tables(&self) -> ProviderResult<Vec<String>>;

    /// Describe the columns of a table in declaration order.
    fn describe_columns(&self, table: &str) -> ProviderResult<Vec<ColumnMetadata>>;

    /// List the foreign keys declared on a table.
    fn list_foreign_keys(&self, table: &str) -> ProviderResult<Vec<ForeignKeyRef>>;

    /// Fetch up to `limit` rows from a table.
    fn sample_rows(&self, table: &str, limit: usize) -> ProviderResult<Vec<Row>>;

    /// Count the rows of a table.
    fn row_count(&self, table: &str) -> ProviderResult<u64>;

    /// Size of the database storage in bytes, if known.
    fn storage_size_bytes(&self) -> Option<u64> {
        None
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// SQL dialect this connection executes.
    fn dialect(&self) -> Dialect;

    /// Execute a statement and collect its rows.
    fn execute(&self, sql: &str) -> ProviderResult<Vec<Row>>;

    /// Handle that aborts the statement currently running on this
    /// connection, if the engine supports it.
    fn interrupter(&self) -> Option<Interrupter> {
        None
    }
}
