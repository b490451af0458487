//! Schema discovery.
//!
//! ```text
//! MetadataProvider ──▶ SchemaAnalyzer ──▶ SchemaSnapshot
//!                          │
//!                          └─ TablePurpose / ColumnPurpose inference
//! ```

mod analyzer;
mod purpose;
mod types;

pub use analyzer::{analyze_provider, AnalyzerError, AnalyzerResult, SchemaAnalyzer};
pub use purpose::{
    is_boolean_type, is_date_type, is_numeric_type, is_text_type, ColumnPurpose, TablePurpose,
};
pub use types::{ColumnInfo, SchemaSnapshot, SchemaStatistics, TableInfo};

pub use crate::metadata::ForeignKeyRef;
