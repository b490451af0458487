//! Purpose inference for tables and columns.
//!
//! Purposes are closed sets of semantic labels inferred from naming and
//! declared-type heuristics. Rules are ordered; the first matching keyword set
//! wins.

use serde::Serialize;
use std::fmt;

/// Semantic label of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TablePurpose {
    Employees,
    Departments,
    Compensation,
    Projects,
    Roles,
    Documents,
    Transactions,
    Products,
    Customers,
    Unknown,
}

/// Semantic label of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPurpose {
    Identifier,
    Name,
    Email,
    Phone,
    Datetime,
    Monetary,
    Location,
    Category,
    Text,
    Numeric,
    Boolean,
    Unknown,
}

const TABLE_RULES: &[(TablePurpose, &[&str])] = &[
    (
        TablePurpose::Employees,
        &["employee", "emp", "staff", "personnel", "worker", "user", "person"],
    ),
    (
        TablePurpose::Departments,
        &["department", "dept", "division", "unit", "team", "group"],
    ),
    (
        TablePurpose::Compensation,
        &["salary", "compensation", "pay", "wage", "payroll", "earning"],
    ),
    (
        TablePurpose::Projects,
        &["project", "assignment", "task", "work", "job"],
    ),
    (
        TablePurpose::Roles,
        &["role", "position", "job", "title", "designation"],
    ),
    (
        TablePurpose::Documents,
        &["document", "doc", "file", "attachment", "record"],
    ),
    (
        TablePurpose::Transactions,
        &["order", "purchase", "sale", "transaction"],
    ),
    (
        TablePurpose::Products,
        &["product", "item", "inventory", "stock"],
    ),
    (TablePurpose::Customers, &["customer", "client", "contact"]),
];

// Identifier is tested separately (it also matches on the "_id" suffix).
const COLUMN_NAME_RULES: &[(ColumnPurpose, &[&str])] = &[
    (
        ColumnPurpose::Name,
        &["name", "title", "label", "fname", "lname", "first_name", "last_name"],
    ),
    (ColumnPurpose::Email, &["email", "mail", "e_mail"]),
    (ColumnPurpose::Phone, &["phone", "tel", "mobile", "contact"]),
    (
        ColumnPurpose::Datetime,
        &["date", "time", "created", "updated", "modified", "timestamp"],
    ),
    (
        ColumnPurpose::Monetary,
        &["salary", "wage", "pay", "compensation", "amount", "price", "cost"],
    ),
    (
        ColumnPurpose::Location,
        &["address", "location", "city", "state", "country", "zip", "postal"],
    ),
    (
        ColumnPurpose::Category,
        &["status", "state", "category", "type", "kind"],
    ),
];

const TEXT_TYPES: &[&str] = &["varchar", "text", "char", "string"];
const NUMERIC_TYPES: &[&str] = &["int", "integer", "numeric", "decimal", "float", "real", "double"];
const DATE_TYPES: &[&str] = &["date", "time", "timestamp", "datetime"];
const BOOLEAN_TYPES: &[&str] = &["bool", "boolean"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Declared type stores character data.
pub fn is_text_type(data_type: &str) -> bool {
    contains_any(&data_type.to_lowercase(), TEXT_TYPES)
}

/// Declared type stores numbers.
pub fn is_numeric_type(data_type: &str) -> bool {
    contains_any(&data_type.to_lowercase(), NUMERIC_TYPES)
}

/// Declared type stores dates or times.
pub fn is_date_type(data_type: &str) -> bool {
    contains_any(&data_type.to_lowercase(), DATE_TYPES)
}

/// Declared type stores booleans.
pub fn is_boolean_type(data_type: &str) -> bool {
    contains_any(&data_type.to_lowercase(), BOOLEAN_TYPES)
}

impl TablePurpose {
    /// Infer a table's purpose from its name.
    pub fn infer(table_name: &str) -> Self {
        let name = table_name.to_lowercase();

        TABLE_RULES
            .iter()
            .find(|(_, keywords)| contains_any(&name, keywords))
            .map(|(purpose, _)| *purpose)
            .unwrap_or(Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::Compensation => "compensation",
            Self::Projects => "projects",
            Self::Roles => "roles",
            Self::Documents => "documents",
            Self::Transactions => "transactions",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }
}

impl ColumnPurpose {
    /// Infer a column's purpose from its name, falling back to its declared type.
    pub fn infer(column_name: &str, data_type: &str) -> Self {
        let name = column_name.to_lowercase();

        if name.contains("id") || name.contains("key") || name.ends_with("_id") {
            return Self::Identifier;
        }

        if let Some((purpose, _)) = COLUMN_NAME_RULES
            .iter()
            .find(|(_, keywords)| contains_any(&name, keywords))
        {
            return *purpose;
        }

        if is_text_type(data_type) {
            Self::Text
        } else if is_numeric_type(data_type) {
            Self::Numeric
        } else if is_date_type(data_type) {
            Self::Datetime
        } else if is_boolean_type(data_type) {
            Self::Boolean
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Datetime => "datetime",
            Self::Monetary => "monetary",
            Self::Location => "location",
            Self::Category => "category",
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }

    /// Numeric or monetary: usable as an aggregate or ordering target.
    pub fn is_quantitative(&self) -> bool {
        matches!(self, Self::Numeric | Self::Monetary)
    }
}

impl fmt::Display for TablePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ColumnPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
