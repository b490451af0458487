#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use nlq::config::{AnalysisSettings, NamingPatterns};
use nlq::metadata::{MetadataProvider, SqliteProvider};
use nlq::schema::{analyze_provider, ColumnPurpose, TablePurpose};
use nlq::semantic::{map_query, QueryType};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_count_query() {
    let snapshot = support::hr_snapshot();
    let mapping = map_query("how many employees are there?", &snapshot);

    assert_eq!(mapping.query_type, QueryType::Count);
    assert_eq!(mapping.table_names().collect::<Vec<_>>(), vec!["employees"]);

    let primary = mapping.primary_table().unwrap();
    assert_close(primary.relevance, 1.0);
    assert_eq!(primary.purpose, TablePurpose::Employees);

    // Table matched, but no column did
    assert!(mapping.columns_for("employees").is_empty());
    assert_close(mapping.confidence, 0.64);
    assert_eq!(
        mapping.sql_hints,
        vec!["Use SELECT COUNT(*) or COUNT(column_name)".to_string()]
    );
}

#[test]
fn test_average_salary_query() {
    let snapshot = support::hr_snapshot();
    let mapping = map_query("what is the average salary?", &snapshot);

    assert_eq!(mapping.query_type, QueryType::Aggregation);

    // The salary mention plus the money-column credit: 0.2 + 0.1
    let primary = mapping.primary_table().unwrap();
    assert_eq!(primary.name, "employees");
    assert_close(primary.relevance, 0.3);
    assert_eq!(mapping.suggested_tables.len(), 1);

    let columns: Vec<&str> = mapping
        .columns_for("employees")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(columns, vec!["salary", "id", "department_id", "manager_id"]);

    let salary = &mapping.columns_for("employees")[0];
    assert_close(salary.relevance, 1.0);
    assert_eq!(salary.purpose, ColumnPurpose::Monetary);
    assert_eq!(salary.data_type, "DECIMAL(10,2)");

    assert_close(mapping.confidence, 0.66);
}

#[test]
fn test_average_salary_on_minimal_table() {
    let snapshot = support::snapshot_of(support::MINIMAL_EMPLOYEES);
    let mapping = map_query("what is the average salary?", &snapshot);

    assert_eq!(mapping.query_type, QueryType::Aggregation);
    assert_eq!(mapping.table_names().collect::<Vec<_>>(), vec!["employees"]);
    assert_close(mapping.primary_table().unwrap().relevance, 0.3);

    let columns: Vec<&str> = mapping
        .columns_for("employees")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(columns, vec!["salary", "id"]);
}

#[test]
fn test_non_monetary_mention_gets_no_credit() {
    let snapshot = support::snapshot_of(
        "CREATE TABLE employees (id INTEGER PRIMARY KEY, name TEXT, tenure INTEGER);",
    );
    let mapping = map_query("what is the average tenure?", &snapshot);

    // A single plain column mention stays at the threshold
    assert!(mapping.suggested_tables.is_empty());
}

#[test]
fn test_two_tables_tie_in_discovery_order() {
    let snapshot = support::hr_snapshot();
    let mapping = map_query("list employees and departments", &snapshot);

    assert_eq!(mapping.query_type, QueryType::Selection);
    assert_eq!(
        mapping.table_names().collect::<Vec<_>>(),
        vec!["departments", "employees"]
    );

    // Every suggested table has a column entry
    assert_eq!(
        mapping.suggested_columns.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["departments", "employees"]
    );

    assert_eq!(
        mapping.sql_hints,
        vec![
            "Use SELECT with WHERE conditions".to_string(),
            "Consider JOINing tables using foreign key relationships".to_string(),
        ]
    );
}

#[test]
fn test_single_column_mention_is_below_threshold() {
    let snapshot = support::hr_snapshot();
    let mapping = map_query("which departments have a budget", &snapshot);

    // projects also has a budget column, but one mention scores exactly 0.2
    assert_eq!(mapping.table_names().collect::<Vec<_>>(), vec!["departments"]);
    assert!(!mapping.suggested_columns.contains_key("projects"));

    let budget = &mapping.columns_for("departments")[0];
    assert_eq!(budget.name, "budget");
    assert_eq!(budget.purpose, ColumnPurpose::Numeric);
}

#[test]
fn test_unmatched_query() {
    let snapshot = support::hr_snapshot();
    let mapping = map_query("what is the weather like today?", &snapshot);

    assert_eq!(mapping.query_type, QueryType::General);
    assert!(mapping.suggested_tables.is_empty());
    assert!(mapping.suggested_columns.is_empty());
    assert!(mapping.sql_hints.is_empty());
    assert_eq!(mapping.confidence, 0.0);
    assert!(mapping.primary_table().is_none());
}

#[test]
fn test_mapping_is_deterministic() {
    let snapshot = support::hr_snapshot();

    for query in [
        "show top 5 highest paid employees",
        "employees grouped by status",
        "list employees and departments",
    ] {
        assert_eq!(map_query(query, &snapshot), map_query(query, &snapshot));
    }
}

#[test]
fn test_scores_stay_in_range() {
    let snapshot = support::hr_snapshot();
    let mapping = map_query(
        "show id name email phone salary status budget of employees departments projects",
        &snapshot,
    );

    assert!((0.0..=1.0).contains(&mapping.confidence));
    for table in &mapping.suggested_tables {
        assert!(table.relevance > 0.2 && table.relevance <= 1.0);
        for column in mapping.columns_for(&table.name) {
            assert!(column.relevance > 0.1 && column.relevance <= 1.0);
        }
    }
    assert!(mapping
        .suggested_tables
        .windows(2)
        .all(|pair| pair[0].relevance >= pair[1].relevance));
}

#[test]
fn test_custom_dictionary() {
    let fixture = support::hr_database();
    let provider = SqliteProvider::open(&fixture.locator()).unwrap();

    let mut patterns = NamingPatterns::default();
    patterns
        .table_synonyms
        .insert("employees".to_string(), vec!["crew".to_string()]);

    let snapshot = analyze_provider(&provider, &Arc::new(patterns), &AnalysisSettings::default())
        .unwrap();
    let mapping = map_query("how big is the crew", &snapshot);

    assert_eq!(mapping.query_type, QueryType::General);
    let primary = mapping.primary_table().unwrap();
    assert_eq!(primary.name, "employees");
    assert_close(primary.relevance, 0.7);
    assert_close(mapping.confidence, 0.4);
}
