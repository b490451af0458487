//! SqliteProvider implementation.
//!
//! Uses `rusqlite` with SQLite's table-valued pragma functions for
//! introspection.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Params};
use serde_json::Value;

use super::error::{ProviderError, ProviderResult};
use super::provider::MetadataProvider;
use super::types::{ColumnMetadata, ForeignKeyRef, Interrupter, Row};
use crate::sql::Dialect;

const TABLES_QUERY: &str = "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name";

const COLUMNS_QUERY: &str = r#"
SELECT name, type, "notnull", dflt_value, pk
FROM pragma_table_info(?1)
ORDER BY cid
"#;

const FOREIGN_KEYS_QUERY: &str = r#"
SELECT "from", "table", "to"
FROM pragma_foreign_key_list(?1)
ORDER BY id, seq
"#;

/// MetadataProvider backed by a SQLite database.
pub struct SqliteProvider {
    conn: Connection,
    /// Backing file; `None` for in-memory databases.
    path: Option<PathBuf>,
}

impl SqliteProvider {
    /// Wrap an already open connection (e.g. an in-memory database).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn, path: None }
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> ProviderResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ProviderError::Connection {
            locator: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_connection(conn))
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Path of the database file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn fetch_rows<P: Params>(&self, sql: &str, params: P) -> ProviderResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let rows = stmt.query_map(params, |row| {
            let mut record = Row::new();
            for (idx, name) in names.iter().enumerate() {
                record.insert(name.clone(), to_json(row.get_ref(idx)?));
            }
            Ok(record)
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

/// Quote an identifier for interpolation into SQL text.
fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<blob {} bytes>", b.len())),
    }
}

impl MetadataProvider for SqliteProvider {
    fn open(locator: &str) -> ProviderResult<Self> {
        let path = PathBuf::from(locator);
        if !path.exists() {
            return Err(ProviderError::NotFound(locator.to_string()));
        }

        let connection_error = |e: rusqlite::Error| ProviderError::Connection {
            locator: locator.to_string(),
            message: e.to_string(),
        };

        let conn = Connection::open(&path).map_err(connection_error)?;

        // SQLite opens lazily; touch the schema so non-database files fail here
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(connection_error)?;

        log::info!("Connected to SQLite database: {}", locator);

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    fn list_tables(&self) -> ProviderResult<Vec<String>> {
        let mut stmt = self.conn.prepare(TABLES_QUERY)?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(names.collect::<Result<Vec<_>, _>>()?)
    }

    fn describe_columns(&self, table: &str) -> ProviderResult<Vec<ColumnMetadata>> {
        let mut stmt = self.conn.prepare(COLUMNS_QUERY)?;
        let columns = stmt.query_map(params![table], |row| {
            Ok(ColumnMetadata {
                name: row.get(0)?,
                data_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                nullable: row.get::<_, i64>(2)? == 0,
                default_value: row.get(3)?,
                is_primary_key: row.get::<_, i64>(4)? > 0,
            })
        })?;
        Ok(columns.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_foreign_keys(&self, table: &str) -> ProviderResult<Vec<ForeignKeyRef>> {
        let mut stmt = self.conn.prepare(FOREIGN_KEYS_QUERY)?;
        let keys = stmt.query_map(params![table], |row| {
            Ok(ForeignKeyRef {
                column: row.get(0)?,
                referenced_table: row.get(1)?,
                // NULL when the key targets the referenced table's primary key implicitly
                referenced_column: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;
        Ok(keys.collect::<Result<Vec<_>, _>>()?)
    }

    fn sample_rows(&self, table: &str, limit: usize) -> ProviderResult<Vec<Row>> {
        let sql = format!("SELECT * FROM {} LIMIT ?1", quote_identifier(table));
        self.fetch_rows(&sql, params![limit as i64])
    }

    fn row_count(&self, table: &str) -> ProviderResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn storage_size_bytes(&self) -> Option<u64> {
        let path = self.path.as_ref()?;
        match fs::metadata(path) {
            Ok(meta) => Some(meta.len()),
            Err(e) => {
                log::warn!("Could not get database file size for {}: {}", path.display(), e);
                None
            }
        }
    }

    fn execute(&self, sql: &str) -> ProviderResult<Vec<Row>> {
        self.fetch_rows(sql, [])
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn interrupter(&self) -> Option<Interrupter> {
        let handle = self.conn.get_interrupt_handle();
        Some(Interrupter::new(move || handle.interrupt()))
    }
}
