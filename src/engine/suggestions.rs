//! Example questions derived from a schema.

use serde::Serialize;
use std::fmt;

use crate::schema::{SchemaSnapshot, TablePurpose};

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 10;

/// Kind of question a suggestion demonstrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuggestionCategory {
    Count,
    Filter,
    Group,
    List,
    Aggregation,
    Ranking,
    Recent,
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A sample question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySuggestion {
    pub text: String,
    pub category: SuggestionCategory,
}

impl QuerySuggestion {
    fn new(text: &str, category: SuggestionCategory) -> Self {
        Self {
            text: text.to_string(),
            category,
        }
    }
}

fn templates(purpose: TablePurpose) -> &'static [(&'static str, SuggestionCategory)] {
    use SuggestionCategory::*;

    match purpose {
        TablePurpose::Employees => &[
            ("How many employees are there?", Count),
            ("Show all employees hired in 2024", Filter),
            ("List employees by department", Group),
        ],
        TablePurpose::Departments => &[
            ("List all departments", List),
            ("Show departments with more than 10 employees", Filter),
        ],
        TablePurpose::Compensation => &[
            ("What is the average salary?", Aggregation),
            ("Show top 5 highest paid employees", Ranking),
        ],
        _ => &[],
    }
}

const GENERIC: &[(&str, SuggestionCategory)] = &[
    ("Show me recent data", SuggestionCategory::Recent),
    ("Find records with high values", SuggestionCategory::Filter),
    ("Group data by categories", SuggestionCategory::Group),
];

/// Sample questions for the tables of a snapshot, in discovery order,
/// followed by generic ones. At most [`MAX_SUGGESTIONS`] are returned.
pub fn suggest_queries(snapshot: &SchemaSnapshot) -> Vec<QuerySuggestion> {
    snapshot
        .tables()
        .flat_map(|t| templates(t.purpose).iter())
        .chain(GENERIC.iter())
        .take(MAX_SUGGESTIONS)
        .map(|(text, category)| QuerySuggestion::new(text, *category))
        .collect()
}
