//! Mapping confidence.

use std::collections::BTreeMap;

use super::classifier::QueryType;
use super::mapping::{SuggestedColumn, SuggestedTable};
use super::weights::confidence as w;

/// Combine relevance and classification signals into a single [0, 1] score.
///
/// Zero when no table was suggested.
pub fn mapping_confidence(
    tables: &[SuggestedTable],
    columns: &BTreeMap<String, Vec<SuggestedColumn>>,
    query_type: QueryType,
) -> f64 {
    if tables.is_empty() {
        return 0.0;
    }

    let total = tables.len() as f64;

    let mean_relevance = tables.iter().map(|t| t.relevance).sum::<f64>() / total;

    let with_columns = tables
        .iter()
        .filter(|t| columns.get(&t.name).is_some_and(|c| !c.is_empty()))
        .count() as f64;
    let coverage = with_columns / total;

    let intent = if query_type == QueryType::General {
        w::GENERAL_INTENT
    } else {
        w::CLASSIFIED_INTENT
    };

    (w::RELEVANCE * mean_relevance + w::COVERAGE * coverage + w::INTENT * intent).clamp(0.0, 1.0)
}
