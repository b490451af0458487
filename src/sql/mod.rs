//! SQL generation.
//!
//! - [`synthesizer`] - builds a statement from a query mapping
//! - [`query`] - SELECT query builder
//! - [`dialect`] - per-database rendering differences

pub mod dialect;
pub mod query;
pub mod synthesizer;

pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use query::{Join, OrderByExpr, Query, SortDir};
pub use synthesizer::{JoinStrategy, SqlSynthesizer};
