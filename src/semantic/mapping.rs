//! Query → schema mapping.
//!
//! [`map_query`] scores every table and column of a snapshot against the
//! query, keeps the ones above the relevance thresholds, classifies the
//! query's intent and derives a confidence value.

use serde::Serialize;
use std::collections::BTreeMap;

use super::classifier::{classify, QueryType};
use super::confidence::mapping_confidence;
use super::relevance::{column_relevance, table_relevance};
use super::weights::threshold;
use crate::schema::{ColumnPurpose, SchemaSnapshot, TablePurpose};

/// A table judged relevant to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedTable {
    pub name: String,
    pub relevance: f64,
    pub purpose: TablePurpose,
}

/// A column judged relevant to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedColumn {
    pub name: String,
    pub relevance: f64,
    pub purpose: ColumnPurpose,
    pub data_type: String,
}

/// Structured linkage between a query and a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMapping {
    /// Query text as given.
    pub query: String,
    pub query_type: QueryType,
    /// Sorted by descending relevance, ties in discovery order.
    pub suggested_tables: Vec<SuggestedTable>,
    /// Table name -> columns sorted by descending relevance. Every suggested
    /// table has an entry, possibly empty.
    pub suggested_columns: BTreeMap<String, Vec<SuggestedColumn>>,
    /// Informational hints for a human writing the SQL by hand.
    pub sql_hints: Vec<String>,
    pub confidence: f64,
}

impl QueryMapping {
    /// The highest-relevance suggested table.
    pub fn primary_table(&self) -> Option<&SuggestedTable> {
        self.suggested_tables.first()
    }

    /// Suggested columns of `table`, empty if it has none.
    pub fn columns_for(&self, table: &str) -> &[SuggestedColumn] {
        self.suggested_columns
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of the suggested tables, in relevance order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.suggested_tables.iter().map(|t| t.name.as_str())
    }
}

/// Map a query onto a schema snapshot.
///
/// Deterministic: the same query and snapshot always produce the same
/// mapping.
pub fn map_query(query: &str, snapshot: &SchemaSnapshot) -> QueryMapping {
    let patterns = snapshot.patterns();
    let lowered = query.to_lowercase();

    let mut suggested_tables: Vec<SuggestedTable> = snapshot
        .tables()
        .filter(|t| !t.name.is_empty())
        .filter_map(|t| {
            let relevance = table_relevance(&lowered, t, patterns);
            (relevance > threshold::TABLE).then(|| SuggestedTable {
                name: t.name.clone(),
                relevance,
                purpose: t.purpose,
            })
        })
        .collect();
    suggested_tables.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));

    let suggested_columns: BTreeMap<String, Vec<SuggestedColumn>> = suggested_tables
        .iter()
        .filter_map(|s| snapshot.table(&s.name))
        .map(|table| {
            let mut columns: Vec<SuggestedColumn> = table
                .columns
                .iter()
                .filter(|c| !c.name.is_empty())
                .filter_map(|c| {
                    let relevance = column_relevance(&lowered, c, patterns);
                    (relevance > threshold::COLUMN).then(|| SuggestedColumn {
                        name: c.name.clone(),
                        relevance,
                        purpose: c.purpose,
                        data_type: c.data_type.clone(),
                    })
                })
                .collect();
            columns.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
            (table.name.clone(), columns)
        })
        .collect();

    let query_type = classify(query, patterns);
    let sql_hints = sql_hints(query_type, suggested_tables.len());
    let confidence = mapping_confidence(&suggested_tables, &suggested_columns, query_type);

    log::debug!(
        "Mapped '{}' as {} over {} table(s), confidence {:.2}",
        query,
        query_type,
        suggested_tables.len(),
        confidence
    );

    QueryMapping {
        query: query.to_string(),
        query_type,
        suggested_tables,
        suggested_columns,
        sql_hints,
        confidence,
    }
}

/// Human-readable hints for the query type.
pub fn sql_hints(query_type: QueryType, table_count: usize) -> Vec<String> {
    let mut hints = Vec::new();

    let hint = match query_type {
        QueryType::Count => Some("Use SELECT COUNT(*) or COUNT(column_name)"),
        QueryType::Aggregation => Some("Use AVG() function"),
        QueryType::Ranking => Some("Use ORDER BY with LIMIT"),
        QueryType::Sum => Some("Use SUM() function"),
        QueryType::Grouping => Some("Use GROUP BY clause"),
        QueryType::Selection => Some("Use SELECT with WHERE conditions"),
        QueryType::General => None,
    };
    hints.extend(hint.map(String::from));

    if table_count > 1 {
        hints.push("Consider JOINing tables using foreign key relationships".to_string());
    }

    hints
}
