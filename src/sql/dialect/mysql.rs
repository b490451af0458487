//! MySQL SQL dialect.
//!
//! MySQL has a dedicated `YEAR()` function returning an integer.

use super::SqlDialect;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn year_extract(&self, column: &str) -> String {
        format!("CAST(YEAR({}) AS CHAR)", column)
    }
}
