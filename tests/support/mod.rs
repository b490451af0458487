//! Shared SQLite fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use nlq::config::{AnalysisSettings, NamingPatterns};
use nlq::metadata::{MetadataProvider, SqliteProvider};
use nlq::schema::{analyze_provider, SchemaSnapshot};
use rusqlite::Connection;
use tempfile::TempDir;

const HR_SCHEMA: &str = r#"
CREATE TABLE departments (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    manager_id INTEGER,
    budget DECIMAL(12,2),
    location TEXT,
    created_date DATE
);

CREATE TABLE employees (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT UNIQUE,
    phone TEXT,
    hire_date DATE,
    salary DECIMAL(10,2),
    department_id INTEGER,
    position TEXT,
    manager_id INTEGER,
    status TEXT DEFAULT 'active',
    FOREIGN KEY (department_id) REFERENCES departments (id),
    FOREIGN KEY (manager_id) REFERENCES employees (id)
);

CREATE TABLE projects (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    start_date DATE,
    end_date DATE,
    budget DECIMAL(12,2),
    status TEXT DEFAULT 'active',
    department_id INTEGER,
    FOREIGN KEY (department_id) REFERENCES departments (id)
);
"#;

const HR_DATA: &str = r#"
INSERT INTO departments VALUES
    (1, 'Engineering', 1, 1500000.00, 'Building A', '2020-01-01'),
    (2, 'Marketing', 4, 800000.00, 'Building B', '2020-01-01'),
    (3, 'Sales', NULL, 1200000.00, 'Building C', '2020-01-01'),
    (4, 'Human Resources', 7, 600000.00, 'Building A', '2020-01-01'),
    (5, 'Finance', NULL, 900000.00, 'Building B', '2020-01-01');

INSERT INTO employees VALUES
    (1, 'John', 'Smith', 'john.smith@company.com', '555-0101', '2021-03-15', 95000.00, 1, 'Senior Software Engineer', NULL, 'active'),
    (2, 'Sarah', 'Johnson', 'sarah.johnson@company.com', '555-0102', '2022-01-10', 87000.00, 1, 'Software Engineer', 1, 'active'),
    (3, 'Emily', 'Chen', 'emily.chen@company.com', '555-0104', '2023-02-01', 98000.00, 1, 'Senior Software Engineer', 1, 'active'),
    (4, 'Lisa', 'Anderson', 'lisa.anderson@company.com', '555-0201', '2021-05-01', 75000.00, 2, 'Marketing Manager', NULL, 'active'),
    (5, 'Kevin', 'Thompson', 'kevin.thompson@company.com', '555-0304', '2023-04-01', 70000.00, 3, 'Sales Representative', NULL, 'active'),
    (6, 'Laura', 'Lewis', 'laura.lewis@company.com', '555-0503', '2023-06-01', 73000.00, 5, 'Accountant', NULL, 'active'),
    (7, 'Maria', 'Rodriguez', 'maria.rodriguez@company.com', '555-0401', '2020-03-15', 78000.00, 4, 'HR Manager', NULL, 'active'),
    (8, 'Mark', 'Walker', 'mark.walker@company.com', '555-0601', '2020-01-01', 90000.00, 1, 'Former Tech Lead', NULL, 'inactive'),
    (9, 'Jessica', 'Hall', 'jessica.hall@company.com', '555-0602', '2021-01-01', 45000.00, 2, 'Former Marketing Coordinator', 4, 'inactive');

INSERT INTO projects VALUES
    (1, 'Platform Rewrite', 'Rebuild the core platform', '2023-01-01', '2023-12-31', 500000.00, 'active', 1),
    (2, 'Brand Refresh', 'New visual identity', '2023-03-01', '2023-09-30', 150000.00, 'completed', 2),
    (3, 'Payroll Audit', 'Annual payroll review', '2024-01-15', NULL, 40000.00, 'active', 5);
"#;

/// Rows per fixture table.
pub const DEPARTMENT_ROWS: u64 = 5;
pub const EMPLOYEE_ROWS: u64 = 9;
pub const PROJECT_ROWS: u64 = 3;

/// A database file living in its own temporary directory.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    fn new(file_name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        Self { _dir: dir, path }
    }

    pub fn locator(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// The HR sample database: departments, employees and projects.
pub fn hr_database() -> Fixture {
    let fixture = Fixture::new("hr.db");
    let conn = Connection::open(&fixture.path).unwrap();
    conn.execute_batch(HR_SCHEMA).unwrap();
    conn.execute_batch(HR_DATA).unwrap();
    fixture
}

/// A valid database with no tables.
pub fn empty_database() -> Fixture {
    let fixture = Fixture::new("empty.db");
    let conn = Connection::open(&fixture.path).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    fixture
}

/// A database whose AUTOINCREMENT table makes SQLite create `sqlite_sequence`.
pub fn database_with_system_table() -> Fixture {
    let fixture = Fixture::new("audit.db");
    let conn = Connection::open(&fixture.path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE events (id INTEGER PRIMARY KEY AUTOINCREMENT, kind TEXT);
        INSERT INTO events (kind) VALUES ('login'), ('logout');
        "#,
    )
    .unwrap();
    fixture
}

/// A file that exists but is not a database.
pub fn garbage_file() -> Fixture {
    let fixture = Fixture::new("garbage.db");
    fs::write(&fixture.path, "this is not a database ".repeat(64)).unwrap();
    fixture
}

/// A bare `employees` table: key, name and a money column.
pub const MINIMAL_EMPLOYEES: &str = r#"
CREATE TABLE employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    salary DECIMAL(10,2)
);
"#;

/// Analyze an in-memory database built from `schema`.
pub fn snapshot_of(schema: &str) -> SchemaSnapshot {
    let provider = SqliteProvider::open_in_memory().unwrap();
    provider.connection().execute_batch(schema).unwrap();
    analyze_provider(
        &provider,
        &Arc::new(NamingPatterns::default()),
        &AnalysisSettings::default(),
    )
    .unwrap()
}

/// Analyze the HR fixture with default patterns and settings.
pub fn hr_snapshot() -> SchemaSnapshot {
    let fixture = hr_database();
    let provider = SqliteProvider::open(&fixture.locator()).unwrap();
    analyze_provider(
        &provider,
        &Arc::new(NamingPatterns::default()),
        &AnalysisSettings::default(),
    )
    .unwrap()
}
