//! Metadata provider module.
//!
//! This module provides the database collaborator of the pipeline: structural
//! introspection for the schema analyzer and statement execution for query
//! sessions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataProvider                           │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │  Introspection             │  Execution                   │  │
//! │  │  - list_tables()           │  - execute()                 │  │
//! │  │  - describe_columns()      │  - interrupter()             │  │
//! │  │  - list_foreign_keys()     │                              │  │
//! │  │  - sample_rows()           │                              │  │
//! │  │  - row_count()             │                              │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SqliteProvider                             │
//! │                (rusqlite, pragma functions)                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod error;
mod provider;
mod sqlite_provider;
mod types;

pub use error::{ProviderError, ProviderResult};
pub use provider::MetadataProvider;
pub use sqlite_provider::SqliteProvider;
pub use types::{ColumnMetadata, ForeignKeyRef, Interrupter, Row};
