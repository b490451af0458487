//! SQLite SQL dialect.
//!
//! SQLite has no `EXTRACT`; dates are text and `strftime` formats them.

use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn year_extract(&self, column: &str) -> String {
        format!("strftime('%Y', {})", column)
    }
}
