//! Shared helper functions for SQL dialect implementations.

/// Quote string with single quotes (standard SQL).
/// Used by: All dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `EXTRACT(YEAR FROM col)` cast to text.
/// Used by: Postgres, DuckDB
pub fn year_extract_standard(column: &str) -> String {
    format!("CAST(EXTRACT(YEAR FROM {}) AS TEXT)", column)
}
