//! SQL dialect definitions.
//!
//! Generated statements only use a small subset of SQL (`COUNT`, `AVG`,
//! `SUM`, `GROUP BY`, `ORDER BY`, `LIMIT`). Year extraction over date columns
//! is the one construct that differs between databases:
//!
//! | Dialect | Year extraction |
//! |---------|-----------------|
//! | SQLite | `strftime('%Y', col)` |
//! | PostgreSQL | `CAST(EXTRACT(YEAR FROM col) AS TEXT)` |
//! | DuckDB | `CAST(EXTRACT(YEAR FROM col) AS TEXT)` |
//! | MySQL | `CAST(YEAR(col) AS CHAR)` |
//!
//! Every form yields text so it compares against a quoted year literal.
//!
//! # Usage
//!
//! ```ignore
//! use nlq::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let year = dialect.year_extract("hire_date");
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// SQL dialect trait - defines how dialect-specific constructs are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote a string literal.
    ///
    /// All supported dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Expression yielding the four-digit year of `column` as text.
    fn year_extract(&self, column: &str) -> String;

    /// Emit the row limit clause.
    fn emit_limit(&self, limit: u64) -> String {
        format!("LIMIT {}", limit)
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "sqlite")]
    Sqlite,
    #[serde(rename = "postgres")]
    Postgres,
    #[serde(rename = "duckdb")]
    DuckDb,
    #[serde(rename = "mysql")]
    MySql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::Postgres => &Postgres,
            Dialect::DuckDb => &DuckDb,
            Dialect::MySql => &MySql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn year_extract(&self, column: &str) -> String {
        self.dialect().year_extract(column)
    }

    fn emit_limit(&self, limit: u64) -> String {
        self.dialect().emit_limit(limit)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown SQL dialect '{0}' (expected sqlite, postgres, duckdb or mysql)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "duckdb" => Ok(Dialect::DuckDb),
            "mysql" => Ok(Dialect::MySql),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
