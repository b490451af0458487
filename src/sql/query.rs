//! Query builder - construct SELECT statements with a fluent API.
//!
//! Expressions are carried as SQL text: the synthesizer only ever emits
//! column names, aggregate calls and simple comparisons. Clauses render in
//! the fixed order SELECT, FROM, JOIN, WHERE, GROUP BY, ORDER BY, LIMIT and
//! empty clauses are omitted.

use super::dialect::{Dialect, SqlDialect};

// =============================================================================
// Joins
// =============================================================================

/// A LEFT JOIN clause. Rows of the FROM table are kept when nothing matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub on: String,
}

impl Join {
    pub fn to_sql(&self) -> String {
        format!("LEFT JOIN {} ON {}", self.table, self.on)
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: String,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            dir: SortDir::Desc,
        }
    }

    pub fn to_sql(&self) -> String {
        let dir = match self.dir {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        };
        format!("{} {}", self.expr, dir)
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql()"]
pub struct Query {
    pub select: Vec<String>,
    pub from: Option<String>,
    pub joins: Vec<Join>,
    /// AND-joined conditions.
    pub conditions: Vec<String>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = exprs.into_iter().map(Into::into).collect();
        self
    }

    /// SELECT *
    pub fn select_star(self) -> Self {
        self.select(["*"])
    }

    /// Set the FROM table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Add a LEFT JOIN.
    pub fn left_join(mut self, table: impl Into<String>, on: impl Into<String>) -> Self {
        self.joins.push(Join {
            table: table.into(),
            on: on.into(),
        });
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = exprs.into_iter().map(Into::into).collect();
        self
    }

    /// Append to the ORDER BY clause.
    pub fn order_by(mut self, expr: OrderByExpr) -> Self {
        self.order_by.push(expr);
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Generate SQL for a specific dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut clauses = Vec::new();

        if !self.select.is_empty() {
            clauses.push(format!("SELECT {}", self.select.join(", ")));
        }

        if let Some(from) = &self.from {
            clauses.push(format!("FROM {}", from));
        }

        clauses.extend(self.joins.iter().map(Join::to_sql));

        if !self.conditions.is_empty() {
            clauses.push(format!("WHERE {}", self.conditions.join(" AND ")));
        }

        if !self.group_by.is_empty() {
            clauses.push(format!("GROUP BY {}", self.group_by.join(", ")));
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self.order_by.iter().map(OrderByExpr::to_sql).collect();
            clauses.push(format!("ORDER BY {}", order.join(", ")));
        }

        if let Some(limit) = self.limit {
            clauses.push(dialect.emit_limit(limit));
        }

        clauses.join(" ")
    }
}

impl std::fmt::Display for Query {
    /// Formats the query using the default dialect (SQLite).
    ///
    /// For dialect-specific SQL, use [`Query::to_sql`] instead.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(Dialect::default()))
    }
}
