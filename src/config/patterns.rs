//! Naming pattern dictionary.
//!
//! Maps canonical domain terms to synonym lists for tables and columns, and
//! query intents to trigger phrases. The dictionary is configuration, not
//! something computed from the database, and is shared read-only between the
//! relevance scorer and the query classifier.
//!
//! A deployment can replace the built-in dictionary with a TOML file:
//!
//! ```toml
//! [column_synonyms]
//! salary = ["wage", "pay", "income"]
//!
//! [table_synonyms]
//! employees = ["employee", "staff"]
//!
//! [query_patterns]
//! count = ["count", "how many"]
//! ```
//!
//! Sections left out of the file keep their built-in contents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for loading a dictionary.
#[derive(Debug, thiserror::Error)]
pub enum PatternsError {
    #[error("Pattern file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read pattern file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse pattern file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Synonym and trigger-phrase dictionary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingPatterns {
    /// Canonical column concept -> synonyms.
    pub column_synonyms: BTreeMap<String, Vec<String>>,

    /// Canonical table concept -> synonyms.
    pub table_synonyms: BTreeMap<String, Vec<String>>,

    /// Query intent (see `QueryType::as_str`) -> trigger phrases.
    pub query_patterns: BTreeMap<String, Vec<String>>,
}

impl Default for NamingPatterns {
    fn default() -> Self {
        Self {
            column_synonyms: synonyms(&[
                (
                    "employee_id",
                    &["emp_id", "staff_id", "worker_id", "personnel_id", "user_id"],
                ),
                ("first_name", &["fname", "given_name", "forename", "name"]),
                ("last_name", &["lname", "surname", "family_name"]),
                ("full_name", &["name", "employee_name", "person_name"]),
                (
                    "salary",
                    &["wage", "pay", "compensation", "income", "earnings", "paid", "salaries"],
                ),
                ("department", &["dept", "division", "unit", "section", "team"]),
                ("hire_date", &["start_date", "join_date", "employment_date", "hired"]),
                ("email", &["email_address", "mail", "e_mail", "contact_email"]),
                ("phone", &["phone_number", "telephone", "mobile", "contact_number"]),
                ("address", &["location", "street_address", "home_address"]),
                ("position", &["job_title", "role", "designation", "title"]),
                ("manager", &["supervisor", "boss", "lead", "manager_id"]),
                ("status", &["state", "condition", "active", "inactive"]),
            ]),
            table_synonyms: synonyms(&[
                (
                    "employees",
                    &["employee", "emp", "staff", "personnel", "worker", "people"],
                ),
                ("departments", &["department", "dept", "division", "unit", "team"]),
                ("salaries", &["salary", "compensation", "pay", "wage", "payroll"]),
                ("projects", &["project", "assignment", "task", "work"]),
                ("orders", &["order", "purchase", "sale", "transaction"]),
                ("customers", &["customer", "client", "contact", "user"]),
                ("products", &["product", "item", "inventory", "stock"]),
            ]),
            query_patterns: synonyms(&[
                ("count", &["count", "how many", "number of", "total"]),
                ("aggregation", &["average", "avg", "mean"]),
                ("ranking", &["highest", "lowest", "top", "bottom", "max", "min"]),
                ("sum", &["sum", "total amount", "sum of"]),
                ("grouping", &["group by", "by department", "by role", "grouped by"]),
                ("selection", &["list", "show", "display", "get", "find", "all"]),
            ]),
        }
    }
}

fn synonyms(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(canonical, terms)| {
            (
                canonical.to_string(),
                terms.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

impl NamingPatterns {
    /// Parse a dictionary from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, PatternsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a dictionary from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PatternsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PatternsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// True if any term of a table concept that `table_name` belongs to
    /// appears in `query`.
    ///
    /// `query` must already be lower-cased.
    pub fn table_concept_mentioned(&self, table_name: &str, query: &str) -> bool {
        concept_mentioned(&self.table_synonyms, table_name, query)
    }

    /// True if any term of a column concept that `column_name` belongs to
    /// appears in `query`.
    ///
    /// `query` must already be lower-cased.
    pub fn column_concept_mentioned(&self, column_name: &str, query: &str) -> bool {
        concept_mentioned(&self.column_synonyms, column_name, query)
    }

    /// Trigger phrases for a query intent, empty if the intent is not configured.
    pub fn triggers(&self, intent: &str) -> &[String] {
        self.query_patterns
            .get(intent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A name belongs to a concept when it equals the canonical key or one of the
/// synonyms. Every term of every such concept is tested against the query.
fn concept_mentioned(concepts: &BTreeMap<String, Vec<String>>, name: &str, query: &str) -> bool {
    let name = name.to_lowercase();

    concepts
        .iter()
        .filter(|(canonical, terms)| **canonical == name || terms.iter().any(|t| *t == name))
        .any(|(canonical, terms)| {
            query.contains(canonical.as_str()) || terms.iter().any(|t| query.contains(t.as_str()))
        })
}
