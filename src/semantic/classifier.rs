//! Query intent classification.
//!
//! A priority-ordered keyword test over the lower-cased query text. The
//! trigger phrases come from the naming pattern dictionary's query-pattern
//! table; the first intent with a matching phrase wins.

use serde::Serialize;
use std::fmt;

use crate::config::NamingPatterns;

/// Intent of a natural-language query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Count,
    Aggregation,
    Sum,
    Ranking,
    Grouping,
    Selection,
    General,
}

/// Intents in the order they are tested.
const PRIORITY: [QueryType; 6] = [
    QueryType::Count,
    QueryType::Aggregation,
    QueryType::Ranking,
    QueryType::Sum,
    QueryType::Grouping,
    QueryType::Selection,
];

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Aggregation => "aggregation",
            Self::Sum => "sum",
            Self::Ranking => "ranking",
            Self::Grouping => "grouping",
            Self::Selection => "selection",
            Self::General => "general",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a query into exactly one intent.
pub fn classify(query: &str, patterns: &NamingPatterns) -> QueryType {
    let query = query.to_lowercase();

    PRIORITY
        .into_iter()
        .find(|intent| {
            patterns
                .triggers(intent.as_str())
                .iter()
                .any(|phrase| query.contains(phrase.as_str()))
        })
        .unwrap_or(QueryType::General)
}
