//! # nlq
//!
//! Natural-language questions over relational databases whose schema is
//! discovered at request time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              MetadataProvider (database)                 │
//! │      (tables, columns, foreign keys, samples, counts)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema analyzer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SchemaSnapshot                          │
//! │      + table / column purpose inference                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [relevance + classifier + confidence]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   QueryMapping                           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [synthesizer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SQL Query                             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query session]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   ResultBundle                           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod schema;
pub mod semantic;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{NamingPatterns, Settings};
    pub use crate::engine::{run_query, QuerySession, ResultBundle};
    pub use crate::error::ErrorKind;
    pub use crate::metadata::{MetadataProvider, SqliteProvider};
    pub use crate::schema::{SchemaAnalyzer, SchemaSnapshot};
    pub use crate::semantic::{map_query, QueryMapping, QueryType};
    pub use crate::sql::{Dialect, JoinStrategy, SqlSynthesizer};
}

// Also export at crate root for convenience
pub use engine::{run_query, QuerySession};
pub use semantic::map_query;
pub use sql::{Dialect, SqlSynthesizer};
