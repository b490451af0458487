//! Schema snapshot types.
//!
//! A [`SchemaSnapshot`] is built once per analysis and never mutated; its
//! fields are private and only reachable through shared references.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::purpose::{ColumnPurpose, TablePurpose};
use crate::config::NamingPatterns;
use crate::metadata::{ColumnMetadata, ForeignKeyRef, Row};

/// A column with its inferred purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    /// Column name, unique within its table.
    pub name: String,
    /// Declared type, verbatim.
    pub data_type: String,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,
    /// Inferred purpose.
    pub purpose: ColumnPurpose,
}

impl From<ColumnMetadata> for ColumnInfo {
    fn from(meta: ColumnMetadata) -> Self {
        let purpose = ColumnPurpose::infer(&meta.name, &meta.data_type);
        Self {
            name: meta.name,
            data_type: meta.data_type,
            nullable: meta.nullable,
            default_value: meta.default_value,
            is_primary_key: meta.is_primary_key,
            purpose,
        }
    }
}

/// A table with its columns, keys, statistics and inferred purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    /// Table name, unique within the snapshot.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnInfo>,
    /// Primary-key column names.
    pub primary_keys: Vec<String>,
    /// Foreign keys declared on this table.
    pub foreign_keys: Vec<ForeignKeyRef>,
    /// Up to a handful of rows for orientation.
    pub sample_rows: Vec<Row>,
    /// Row count, 0 if it could not be read.
    pub row_count: u64,
    /// Inferred purpose.
    pub purpose: TablePurpose,
    /// Column name -> inferred purpose.
    pub column_purposes: BTreeMap<String, ColumnPurpose>,
}

impl TableInfo {
    /// Build a table record, inferring table and column purposes.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<ColumnMetadata>,
        foreign_keys: Vec<ForeignKeyRef>,
        sample_rows: Vec<Row>,
        row_count: u64,
    ) -> Self {
        let name = name.into();
        let columns: Vec<ColumnInfo> = columns.into_iter().map(ColumnInfo::from).collect();

        let primary_keys = columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.clone())
            .collect();

        let column_purposes = columns
            .iter()
            .map(|c| (c.name.clone(), c.purpose))
            .collect();

        Self {
            purpose: TablePurpose::infer(&name),
            name,
            columns,
            primary_keys,
            foreign_keys,
            sample_rows,
            row_count,
            column_purposes,
        }
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Aggregate statistics over a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaStatistics {
    pub total_tables: usize,
    pub total_rows: u64,
    /// Table name -> row count.
    pub table_sizes: BTreeMap<String, u64>,
    /// Storage size in MB, rounded to 2 decimals.
    pub database_size_mb: f64,
}

/// Immutable structural and semantic model of a database.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSnapshot {
    tables: BTreeMap<String, TableInfo>,
    relationships: BTreeMap<String, Vec<ForeignKeyRef>>,
    statistics: SchemaStatistics,
    #[serde(skip)]
    patterns: Arc<NamingPatterns>,
}

impl SchemaSnapshot {
    /// Assemble a snapshot, deriving relationships and statistics from the
    /// tables.
    pub fn new(
        tables: Vec<TableInfo>,
        patterns: Arc<NamingPatterns>,
        storage_size_bytes: Option<u64>,
    ) -> Self {
        let relationships = tables
            .iter()
            .map(|t| (t.name.clone(), t.foreign_keys.clone()))
            .collect();

        let table_sizes: BTreeMap<String, u64> = tables
            .iter()
            .map(|t| (t.name.clone(), t.row_count))
            .collect();

        let statistics = SchemaStatistics {
            total_tables: tables.len(),
            total_rows: table_sizes.values().sum(),
            table_sizes,
            database_size_mb: storage_size_bytes.map(bytes_to_mb).unwrap_or(0.0),
        };

        let tables = tables.into_iter().map(|t| (t.name.clone(), t)).collect();

        Self {
            tables,
            relationships,
            statistics,
            patterns,
        }
    }

    /// Tables in discovery order.
    pub fn tables(&self) -> impl Iterator<Item = &TableInfo> {
        self.tables.values()
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(name)
    }

    /// Table name -> foreign keys originating from that table.
    pub fn relationships(&self) -> &BTreeMap<String, Vec<ForeignKeyRef>> {
        &self.relationships
    }

    pub fn statistics(&self) -> &SchemaStatistics {
        &self.statistics
    }

    /// Naming pattern dictionary the snapshot is scored against.
    pub fn patterns(&self) -> &NamingPatterns {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn bytes_to_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}
