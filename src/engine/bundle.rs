//! Records returned by a query session.

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::documents::DocumentHit;
use crate::error::ErrorKind;
use crate::metadata::Row;
use crate::semantic::{QueryMapping, QueryType, SuggestedColumn, SuggestedTable};

/// Outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleStatus {
    /// SQL was generated and executed.
    Success,
    /// No table was relevant, nothing was executed.
    Unresolved,
    /// The generated SQL failed to execute.
    Failed,
}

/// Everything produced for one natural-language request.
#[derive(Debug, Clone, Serialize)]
pub struct ResultBundle {
    pub request_id: Uuid,
    pub status: BundleStatus,
    pub sql: Option<String>,
    pub rows: Vec<Row>,
    pub document_hits: Vec<DocumentHit>,
    pub mapping: Option<QueryMapping>,
    pub confidence: f64,
    pub elapsed_seconds: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl ResultBundle {
    /// Bundle for a request whose statement ran (or had nothing to run).
    pub(crate) fn completed(
        request_id: Uuid,
        sql: Option<String>,
        rows: Vec<Row>,
        document_hits: Vec<DocumentHit>,
        mapping: QueryMapping,
        elapsed_seconds: f64,
    ) -> Self {
        let (status, message, error) = match sql {
            Some(_) => (
                BundleStatus::Success,
                format!("Query executed successfully in {:.2}s", elapsed_seconds),
                None,
            ),
            None => (
                BundleStatus::Unresolved,
                "No relevant tables found for this query".to_string(),
                Some(ErrorKind::SynthesisUnresolved),
            ),
        };

        Self {
            request_id,
            status,
            sql,
            rows,
            document_hits,
            confidence: mapping.confidence,
            mapping: Some(mapping),
            elapsed_seconds,
            message,
            error,
        }
    }

    /// Zero-confidence bundle for a statement that failed to execute.
    pub(crate) fn failed(
        request_id: Uuid,
        sql: Option<String>,
        mapping: QueryMapping,
        elapsed_seconds: f64,
        reason: &str,
    ) -> Self {
        Self {
            request_id,
            status: BundleStatus::Failed,
            sql,
            rows: Vec::new(),
            document_hits: Vec::new(),
            mapping: Some(mapping),
            confidence: 0.0,
            elapsed_seconds,
            message: format!("Query execution failed: {}", reason),
            error: Some(ErrorKind::ExecutionError),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == BundleStatus::Success
    }
}

/// How a query would be processed, without running it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryExplanation {
    pub query: String,
    pub query_type: QueryType,
    pub confidence: f64,
    pub suggested_tables: Vec<SuggestedTable>,
    pub suggested_columns: BTreeMap<String, Vec<SuggestedColumn>>,
    pub sql: Option<String>,
    pub sql_hints: Vec<String>,
    /// Human-readable summary.
    pub explanation: String,
}

impl QueryExplanation {
    pub(crate) fn new(mapping: QueryMapping, sql: Option<String>) -> Self {
        let explanation = explanation_text(&mapping, sql.as_deref());
        Self {
            query: mapping.query,
            query_type: mapping.query_type,
            confidence: mapping.confidence,
            suggested_tables: mapping.suggested_tables,
            suggested_columns: mapping.suggested_columns,
            sql,
            sql_hints: mapping.sql_hints,
            explanation,
        }
    }
}

fn explanation_text(mapping: &QueryMapping, sql: Option<&str>) -> String {
    let mut text = format!(
        "I interpreted your query '{}' as a {} operation. ",
        mapping.query, mapping.query_type
    );

    if !mapping.suggested_tables.is_empty() {
        let names: Vec<&str> = mapping.table_names().take(2).collect();
        text.push_str(&format!("I found these relevant tables: {}. ", names.join(", ")));
    }

    match sql {
        Some(sql) => text.push_str(&format!("This was converted to the SQL query: {}", sql)),
        None => text.push_str("I couldn't generate a suitable SQL query for this request."),
    }

    text.push_str(&format!(" Confidence level: {:.1}%", mapping.confidence * 100.0));
    text
}

/// Whether a query can be turned into SQL, without running it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryValidation {
    pub is_valid: bool,
    pub confidence: f64,
    pub sql: Option<String>,
    pub mapping: QueryMapping,
    pub message: String,
}

impl QueryValidation {
    pub(crate) fn new(mapping: QueryMapping, sql: Option<String>) -> Self {
        let is_valid = sql.is_some() && !mapping.suggested_tables.is_empty();
        let confidence = mapping.confidence;
        Self {
            is_valid,
            confidence,
            sql,
            message: format!(
                "Query validation complete with {:.1}% confidence",
                confidence * 100.0
            ),
            mapping,
        }
    }
}
