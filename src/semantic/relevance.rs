//! Relevance scoring between a query and schema elements.
//!
//! Pure functions of (lower-cased query, schema element, dictionary). Scores
//! are additive signal weights clamped to [0, 1].

use super::weights;
use crate::config::NamingPatterns;
use crate::schema::{
    is_date_type, is_numeric_type, is_text_type, ColumnInfo, ColumnPurpose, TableInfo,
};

fn mentions(query: &str, term: &str) -> bool {
    !term.is_empty() && query.contains(&term.to_lowercase())
}

/// Score how relevant a table is to a query.
///
/// `query` must already be lower-cased.
pub fn table_relevance(query: &str, table: &TableInfo, patterns: &NamingPatterns) -> f64 {
    let mut score = 0.0;

    if mentions(query, &table.name) {
        score += weights::TABLE_NAME;
    }

    if patterns.table_concept_mentioned(&table.name, query) {
        score += weights::TABLE_SYNONYM;
    }

    if table.purpose.is_known() && query.contains(table.purpose.as_str()) {
        score += weights::TABLE_PURPOSE;
    }

    let mentioned: Vec<&ColumnInfo> = table
        .columns
        .iter()
        .filter(|c| mentions(query, &c.name))
        .collect();
    score += weights::TABLE_COLUMN_MENTION * mentioned.len() as f64;

    if mentioned.len() > weights::MULTI_COLUMN_MIN {
        score += weights::MULTI_COLUMN_BONUS;
    }

    // Credited once, however many money columns are named
    if mentioned.iter().any(|c| c.purpose == ColumnPurpose::Monetary) {
        score += weights::MONETARY_MENTION;
    }

    score.clamp(0.0, 1.0)
}

/// Score how relevant a column is to a query.
///
/// `query` must already be lower-cased.
pub fn column_relevance(query: &str, column: &ColumnInfo, patterns: &NamingPatterns) -> f64 {
    let mut score = 0.0;

    if mentions(query, &column.name) {
        score += weights::COLUMN_NAME;
    }

    if patterns.column_concept_mentioned(&column.name, query) {
        score += weights::COLUMN_SYNONYM;
    }

    if column.purpose.is_known() && query.contains(column.purpose.as_str()) {
        score += weights::COLUMN_PURPOSE;
    }

    // Type affinity
    if query.contains("salary") && is_numeric_type(&column.data_type) {
        score += weights::TYPE_AFFINITY;
    }
    if query.contains("name") && is_text_type(&column.data_type) {
        score += weights::TYPE_AFFINITY;
    }
    if query.contains("date") && is_date_type(&column.data_type) {
        score += weights::TYPE_AFFINITY;
    }

    score.clamp(0.0, 1.0)
}
