//! Raw metadata records returned by a provider.
//!
//! These carry what the database reports and nothing inferred. The schema
//! analyzer turns them into the typed records of [`crate::schema`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A result or sample row, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Column metadata as reported by the engine's introspection facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Declared type, verbatim (may be empty in SQLite).
    pub data_type: String,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,
}

impl ColumnMetadata {
    /// A nullable, non-key column without a default.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            default_value: None,
            is_primary_key: false,
        }
    }

    /// Mark as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }
}

/// A declared foreign key.
///
/// Directional: `column` on the owning table references
/// `referenced_table.referenced_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Column on the owning table.
    pub column: String,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced column.
    pub referenced_column: String,
}

impl ForeignKeyRef {
    pub fn new(
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

/// Aborts a running database call from another thread.
#[derive(Clone)]
pub struct Interrupter(Arc<dyn Fn() + Send + Sync>);

impl Interrupter {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Interrupt whatever statement is currently running.
    pub fn interrupt(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Interrupter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Interrupter")
    }
}
