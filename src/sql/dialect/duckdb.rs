//! DuckDB SQL dialect.
//!
//! DuckDB follows PostgreSQL for date part extraction.

use super::helpers;
use super::SqlDialect;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn year_extract(&self, column: &str) -> String {
        helpers::year_extract_standard(column)
    }
}
