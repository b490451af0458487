//! PostgreSQL SQL dialect.

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn year_extract(&self, column: &str) -> String {
        helpers::year_extract_standard(column)
    }
}
