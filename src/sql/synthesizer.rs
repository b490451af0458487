//! SQL synthesis from a query mapping.
//!
//! Turns a [`QueryMapping`] into a single SELECT statement. The statement
//! shape is chosen by the query type, then filters, joins and limits are
//! layered on top from keyword patterns in the query text.
//!
//! # Example
//!
//! ```ignore
//! use nlq::semantic::map_query;
//! use nlq::sql::{Dialect, SqlSynthesizer};
//!
//! let mapping = map_query("how many employees are there?", &snapshot);
//! let sql = SqlSynthesizer::new(Dialect::Sqlite).synthesize(&mapping.query, &mapping);
//! assert_eq!(sql.as_deref(), Some("SELECT COUNT(*) FROM employees"));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::dialect::{Dialect, SqlDialect};
use super::query::{OrderByExpr, Query};
use crate::config::QuerySettings;
use crate::error::ErrorKind;
use crate::schema::{ColumnPurpose, SchemaSnapshot};
use crate::semantic::{QueryMapping, QueryType, SuggestedColumn, SuggestedTable};

static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

static SALARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"salary\s*(?:is\s+)?(above|over|more than|greater than|>|below|under|less than|<)\s*([\d,]+)",
    )
    .unwrap()
});

static RANK_LIMIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:top|bottom)\s+(\d+)").unwrap());

const DESCENDING_WORDS: &[&str] = &["highest", "max", "top"];
const ASCENDING_WORDS: &[&str] = &["lowest", "min", "bottom"];

/// Concept groups a GROUP BY column can be picked from, in search order.
const GROUPING_CONCEPTS: &[(&str, &[&str])] = &[
    ("department", &["department", "dept", "division", "unit"]),
    ("role", &["role", "position", "title", "job"]),
    ("status", &["status", "state", "active"]),
    ("category", &["category", "type", "kind"]),
    ("location", &["location", "city", "state", "country"]),
];

/// How JOIN clauses are derived when several tables are suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Only the employee/department naming convention
    /// (`employees.department_id = departments.id`).
    #[default]
    NamingPattern,
    /// Discovered foreign keys between the primary table and each other
    /// suggested table. Needs a schema snapshot.
    ForeignKeys,
}

/// Builds SQL statements from query mappings.
#[derive(Debug, Clone)]
pub struct SqlSynthesizer<'a> {
    dialect: Dialect,
    join_strategy: JoinStrategy,
    schema: Option<&'a SchemaSnapshot>,
    max_select_columns: usize,
    default_rank_limit: u64,
}

impl<'a> SqlSynthesizer<'a> {
    pub fn new(dialect: Dialect) -> Self {
        let defaults = QuerySettings::default();
        Self {
            dialect,
            join_strategy: defaults.join_strategy,
            schema: None,
            max_select_columns: defaults.max_select_columns,
            default_rank_limit: defaults.default_rank_limit,
        }
    }

    /// Build a synthesizer from the `[query]` settings.
    pub fn from_settings(dialect: Dialect, settings: &QuerySettings) -> Self {
        Self::new(dialect)
            .with_join_strategy(settings.join_strategy)
            .with_max_select_columns(settings.max_select_columns)
            .with_default_rank_limit(settings.default_rank_limit)
    }

    /// Schema used to resolve foreign-key joins.
    pub fn with_schema(mut self, schema: &'a SchemaSnapshot) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_join_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.join_strategy = strategy;
        self
    }

    pub fn with_max_select_columns(mut self, max: usize) -> Self {
        self.max_select_columns = max;
        self
    }

    pub fn with_default_rank_limit(mut self, limit: u64) -> Self {
        self.default_rank_limit = limit;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Generate SQL text, or `None` when no table was suggested.
    pub fn synthesize(&self, query: &str, mapping: &QueryMapping) -> Option<String> {
        let sql = self.build(query, mapping)?.to_sql(self.dialect);
        log::info!("Generated SQL: {}", sql);
        Some(sql)
    }

    /// Build the query structure, or `None` when no table was suggested.
    pub fn build(&self, query: &str, mapping: &QueryMapping) -> Option<Query> {
        let Some(primary) = mapping.primary_table() else {
            log::warn!(
                "[{}] No table is relevant to '{}'",
                ErrorKind::SynthesisUnresolved,
                query
            );
            return None;
        };

        let lowered = query.to_lowercase();
        let columns = mapping.columns_for(&primary.name);
        let numeric = first_numeric_column(columns);

        let mut q = Query::new().from(primary.name.as_str());

        q = match mapping.query_type {
            QueryType::Count => q.select(["COUNT(*)"]),
            QueryType::Aggregation => match numeric {
                Some(col) => q.select([format!("AVG({})", col)]),
                None => q.select(["COUNT(*)"]),
            },
            QueryType::Sum => match numeric {
                Some(col) => q.select([format!("SUM({})", col)]),
                None => q.select_star(),
            },
            QueryType::Ranking => {
                q = self.select_relevant(q, columns);

                if let Some(col) = numeric {
                    if contains_any(&lowered, DESCENDING_WORDS) {
                        q = q.order_by(OrderByExpr::desc(col));
                    } else if contains_any(&lowered, ASCENDING_WORDS) {
                        q = q.order_by(OrderByExpr::asc(col));
                    }
                }

                q.limit(rank_limit(&lowered).unwrap_or(self.default_rank_limit))
            }
            QueryType::Grouping => {
                let group_columns = grouping_columns(&lowered, columns);
                if group_columns.is_empty() {
                    q.select_star()
                } else {
                    let mut select = group_columns.clone();
                    select.push("COUNT(*)".to_string());
                    q.select(select).group_by(group_columns)
                }
            }
            QueryType::Selection | QueryType::General => self.select_relevant(q, columns),
        };

        for condition in self.where_conditions(query, &lowered, columns) {
            q = q.filter(condition);
        }

        for (table, on) in self.joins(&mapping.suggested_tables) {
            q = q.left_join(table, on);
        }

        Some(q)
    }

    fn select_relevant(&self, q: Query, columns: &[SuggestedColumn]) -> Query {
        if columns.is_empty() {
            return q.select_star();
        }

        q.select(
            columns
                .iter()
                .take(self.max_select_columns.max(1))
                .map(|c| c.name.as_str()),
        )
    }

    fn where_conditions(&self, query: &str, lowered: &str, columns: &[SuggestedColumn]) -> Vec<String> {
        let mut conditions = Vec::new();

        if let Some(year) = YEAR_PATTERN.captures(query).and_then(|c| c.get(1)) {
            if let Some(col) = columns.iter().find(|c| c.purpose == ColumnPurpose::Datetime) {
                conditions.push(format!(
                    "{} = {}",
                    self.dialect.year_extract(&col.name),
                    self.dialect.quote_string(year.as_str())
                ));
            }
        }

        if lowered.contains("active") {
            if let Some(col) = columns.iter().find(|c| c.name.to_lowercase().contains("status")) {
                conditions.push(format!(
                    "{} = {}",
                    col.name,
                    self.dialect.quote_string("active")
                ));
            }
        }

        if let Some(caps) = SALARY_PATTERN.captures(lowered) {
            let operator = match &caps[1] {
                "above" | "over" | "more than" | "greater than" | ">" => ">",
                _ => "<",
            };
            let amount = caps[2].replace(',', "");
            let salary_column = columns
                .iter()
                .find(|c| c.name.to_lowercase().contains("salary"))
                .filter(|_| !amount.is_empty());

            if let Some(col) = salary_column {
                conditions.push(format!("{} {} {}", col.name, operator, amount));
            }
        }

        conditions
    }

    fn joins(&self, tables: &[SuggestedTable]) -> Vec<(String, String)> {
        let Some((primary, others)) = tables.split_first() else {
            return Vec::new();
        };

        others
            .iter()
            .filter_map(|secondary| match self.join_strategy {
                JoinStrategy::NamingPattern => naming_pattern_join(&primary.name, &secondary.name),
                JoinStrategy::ForeignKeys => self.foreign_key_join(&primary.name, &secondary.name),
            })
            .collect()
    }

    fn foreign_key_join(&self, primary: &str, secondary: &str) -> Option<(String, String)> {
        let Some(schema) = self.schema else {
            log::debug!("No schema attached, skipping foreign-key join to {}", secondary);
            return None;
        };

        let outgoing = schema
            .table(primary)?
            .foreign_keys
            .iter()
            .find(|fk| fk.referenced_table == secondary)
            .map(|fk| {
                format!(
                    "{}.{} = {}.{}",
                    primary, fk.column, secondary, fk.referenced_column
                )
            });

        let on = outgoing.or_else(|| {
            schema
                .table(secondary)?
                .foreign_keys
                .iter()
                .find(|fk| fk.referenced_table == primary)
                .map(|fk| {
                    format!(
                        "{}.{} = {}.{}",
                        secondary, fk.column, primary, fk.referenced_column
                    )
                })
        })?;

        Some((secondary.to_string(), on))
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn first_numeric_column(columns: &[SuggestedColumn]) -> Option<&str> {
    columns
        .iter()
        .find(|c| c.purpose.is_quantitative())
        .map(|c| c.name.as_str())
}

fn rank_limit(lowered: &str) -> Option<u64> {
    RANK_LIMIT_PATTERN
        .captures(lowered)
        .and_then(|c| c[1].parse().ok())
}

fn grouping_columns(lowered: &str, columns: &[SuggestedColumn]) -> Vec<String> {
    let mut picked: Vec<String> = Vec::new();

    for (_, words) in GROUPING_CONCEPTS {
        if !contains_any(lowered, words) {
            continue;
        }

        let found = columns
            .iter()
            .find(|c| contains_any(&c.name.to_lowercase(), words));

        if let Some(col) = found {
            if !picked.contains(&col.name) {
                picked.push(col.name.clone());
            }
        }
    }

    picked
}

fn naming_pattern_join(primary: &str, secondary: &str) -> Option<(String, String)> {
    let p = primary.to_lowercase();
    let s = secondary.to_lowercase();

    if s.contains("department") && p.contains("employee") {
        Some((
            secondary.to_string(),
            format!("{}.department_id = {}.id", primary, secondary),
        ))
    } else if s.contains("employee") && p.contains("department") {
        Some((
            secondary.to_string(),
            format!("{}.id = {}.department_id", primary, secondary),
        ))
    } else {
        None
    }
}
