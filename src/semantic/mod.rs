//! Semantic mapping of natural-language queries onto a schema.
//!
//! The layer is pure: every function here is a deterministic computation
//! over an immutable [`SchemaSnapshot`](crate::schema::SchemaSnapshot) and
//! the naming pattern dictionary it carries.
//!
//! 1. **Relevance** - score each table and column against the query text
//! 2. **Classification** - pick exactly one query intent
//! 3. **Confidence** - combine both signals into one value
//!
//! # Example
//!
//! ```ignore
//! use nlq::semantic::map_query;
//!
//! let mapping = map_query("what is the average salary?", &snapshot);
//! assert_eq!(mapping.primary_table().unwrap().name, "employees");
//! ```

mod classifier;
mod confidence;
mod mapping;
mod relevance;

pub use classifier::{classify, QueryType};
pub use confidence::mapping_confidence;
pub use mapping::{map_query, sql_hints, QueryMapping, SuggestedColumn, SuggestedTable};
pub use relevance::{column_relevance, table_relevance};

/// Signal weights and cut-offs used by the scorers.
pub mod weights {
    /// Table relevance signals.
    pub const TABLE_NAME: f64 = 0.8;
    pub const TABLE_SYNONYM: f64 = 0.7;
    pub const TABLE_PURPOSE: f64 = 0.6;
    /// Added per column whose name appears in the query.
    pub const TABLE_COLUMN_MENTION: f64 = 0.2;
    /// Bonus once more than [`MULTI_COLUMN_MIN`] columns are mentioned.
    pub const MULTI_COLUMN_BONUS: f64 = 0.3;
    pub const MULTI_COLUMN_MIN: usize = 2;
    /// Added once when a mentioned column has monetary purpose.
    pub const MONETARY_MENTION: f64 = 0.1;

    /// Column relevance signals.
    pub const COLUMN_NAME: f64 = 0.8;
    pub const COLUMN_SYNONYM: f64 = 0.7;
    pub const COLUMN_PURPOSE: f64 = 0.5;
    /// Query keyword paired with a compatible declared type.
    pub const TYPE_AFFINITY: f64 = 0.3;

    /// Minimum relevance (exclusive) for a suggestion.
    pub mod threshold {
        pub const TABLE: f64 = 0.2;
        pub const COLUMN: f64 = 0.1;
    }

    /// Confidence composition.
    pub mod confidence {
        pub const RELEVANCE: f64 = 0.4;
        pub const COVERAGE: f64 = 0.3;
        pub const INTENT: f64 = 0.3;
        /// Intent signal when the query was classified.
        pub const CLASSIFIED_INTENT: f64 = 0.8;
        /// Intent signal for `general` queries.
        pub const GENERAL_INTENT: f64 = 0.4;
    }
}
