#[path = "../support/mod.rs"]
mod support;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use insta::assert_snapshot;
use nlq::config::{NamingPatterns, Settings};
use nlq::engine::{
    BundleStatus, DocumentHit, DocumentSearch, DocumentSearchError, QuerySession,
    SuggestionCategory,
};
use nlq::error::ErrorKind;
use nlq::metadata::{
    ColumnMetadata, ForeignKeyRef, Interrupter, MetadataProvider, ProviderError, ProviderResult,
    Row, SqliteProvider,
};
use nlq::semantic::QueryType;
use nlq::sql::Dialect;
use tokio::sync::mpsc as async_mpsc;

async fn open(fixture: &support::Fixture) -> QuerySession<SqliteProvider> {
    QuerySession::<SqliteProvider>::open(&fixture.locator(), Settings::default())
        .await
        .unwrap()
}

/// Index returning one canned hit and counting calls.
#[derive(Default)]
struct StaticIndex {
    calls: AtomicUsize,
}

#[async_trait]
impl DocumentSearch for StaticIndex {
    async fn search(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<DocumentHit>, DocumentSearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(top_k, 5);
        Ok(vec![DocumentHit {
            source: "handbook.pdf".to_string(),
            excerpt: format!("Policy excerpt for: {}", text),
            similarity: 0.83,
        }])
    }
}

struct OfflineIndex;

#[async_trait]
impl DocumentSearch for OfflineIndex {
    async fn search(&self, _: &str, _: usize) -> Result<Vec<DocumentHit>, DocumentSearchError> {
        Err(DocumentSearchError::Unavailable("index is rebuilding".to_string()))
    }
}

/// SQLite provider whose first statement blocks until released, and whose
/// interrupter only counts calls.
struct GatedProvider {
    inner: SqliteProvider,
    hold_first: AtomicBool,
    started: async_mpsc::UnboundedSender<()>,
    release: Mutex<mpsc::Receiver<()>>,
    interrupts: Arc<AtomicUsize>,
}

struct Gate {
    started: async_mpsc::UnboundedReceiver<()>,
    release: mpsc::Sender<()>,
    interrupts: Arc<AtomicUsize>,
}

fn gated(fixture: &support::Fixture) -> (GatedProvider, Gate) {
    let (started_tx, started_rx) = async_mpsc::unbounded_channel();
    let (release_tx, release_rx) = mpsc::channel();
    let interrupts = Arc::new(AtomicUsize::new(0));

    let provider = GatedProvider {
        inner: SqliteProvider::open(&fixture.locator()).unwrap(),
        hold_first: AtomicBool::new(true),
        started: started_tx,
        release: Mutex::new(release_rx),
        interrupts: Arc::clone(&interrupts),
    };
    let gate = Gate {
        started: started_rx,
        release: release_tx,
        interrupts,
    };
    (provider, gate)
}

impl MetadataProvider for GatedProvider {
    fn open(locator: &str) -> ProviderResult<Self> {
        Err(ProviderError::NotFound(locator.to_string()))
    }

    fn list_tables(&self) -> ProviderResult<Vec<String>> {
        self.inner.list_tables()
    }

    fn describe_columns(&self, table: &str) -> ProviderResult<Vec<ColumnMetadata>> {
        self.inner.describe_columns(table)
    }

    fn list_foreign_keys(&self, table: &str) -> ProviderResult<Vec<ForeignKeyRef>> {
        self.inner.list_foreign_keys(table)
    }

    fn sample_rows(&self, table: &str, limit: usize) -> ProviderResult<Vec<Row>> {
        self.inner.sample_rows(table, limit)
    }

    fn row_count(&self, table: &str) -> ProviderResult<u64> {
        self.inner.row_count(table)
    }

    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn execute(&self, sql: &str) -> ProviderResult<Vec<Row>> {
        if self.hold_first.swap(false, Ordering::SeqCst) {
            let _ = self.started.send(());
            let _ = self.release.lock().unwrap().recv();
        }
        self.inner.execute(sql)
    }

    fn interrupter(&self) -> Option<Interrupter> {
        let interrupts = Arc::clone(&self.interrupts);
        Some(Interrupter::new(move || {
            interrupts.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

// ----------------------------------------------------------------------------
// run_query
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_count_request() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let bundle = session
        .run_query("how many employees are there?", false)
        .await
        .unwrap();

    assert_eq!(bundle.status, BundleStatus::Success);
    assert!(bundle.is_success());
    assert_eq!(bundle.sql.as_deref(), Some("SELECT COUNT(*) FROM employees"));
    assert_eq!(bundle.rows.len(), 1);
    assert_eq!(bundle.rows[0]["COUNT(*)"], 9);
    assert!(bundle.message.starts_with("Query executed successfully in "));
    assert!(bundle.message.ends_with('s'));
    assert!(bundle.error.is_none());
    assert!(bundle.document_hits.is_empty());
    assert!((bundle.confidence - 0.64).abs() < 1e-9);
    assert!(bundle.elapsed_seconds >= 0.0);

    let mapping = bundle.mapping.unwrap();
    assert_eq!(mapping.query_type, QueryType::Count);
}

#[tokio::test]
async fn test_average_request() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let bundle = session
        .run_query("what is the average salary?", false)
        .await
        .unwrap();

    assert_eq!(bundle.rows[0]["AVG(salary)"].as_f64(), Some(79000.0));
}

#[tokio::test]
async fn test_ranking_request() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let bundle = session
        .run_query("show top 5 highest paid employees", false)
        .await
        .unwrap();

    let ids: Vec<i64> = bundle
        .rows
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1, 8, 2, 7]);
    assert_eq!(bundle.rows[0]["salary"].as_f64(), Some(98000.0));
}

#[tokio::test]
async fn test_grouping_request() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let bundle = session
        .run_query("employees grouped by status", false)
        .await
        .unwrap();

    let counts: BTreeMap<String, i64> = bundle
        .rows
        .iter()
        .map(|row| {
            (
                row["status"].as_str().unwrap().to_string(),
                row["COUNT(*)"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(counts["active"], 7);
    assert_eq!(counts["inactive"], 2);
}

#[tokio::test]
async fn test_filtered_requests() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let hired = session
        .run_query("show employees hired in 2023", false)
        .await
        .unwrap();
    assert_eq!(hired.rows.len(), 3);

    let paid = session
        .run_query("how many employees have salary above 50000", false)
        .await
        .unwrap();
    assert_eq!(paid.rows[0]["COUNT(*)"], 8);
}

#[tokio::test]
async fn test_join_request() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let bundle = session
        .run_query("list employees and departments", false)
        .await
        .unwrap();

    assert!(bundle.is_success());
    // One row per employee; every department has at least one
    assert_eq!(bundle.rows.len(), 9);
}

#[tokio::test]
async fn test_unresolved_request() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let bundle = session
        .run_query("what is the weather like today?", false)
        .await
        .unwrap();

    assert_eq!(bundle.status, BundleStatus::Unresolved);
    assert!(bundle.sql.is_none());
    assert!(bundle.rows.is_empty());
    assert_eq!(bundle.confidence, 0.0);
    assert_eq!(bundle.error, Some(ErrorKind::SynthesisUnresolved));
    assert_eq!(bundle.message, "No relevant tables found for this query");
}

#[tokio::test]
async fn test_execution_failure_yields_failed_bundle() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;
    session.schema().await.unwrap();

    // The schema changes under the cached snapshot
    let conn = rusqlite::Connection::open(&fixture.path).unwrap();
    conn.execute_batch("DROP TABLE employees;").unwrap();

    let bundle = session
        .run_query("how many employees are there?", false)
        .await
        .unwrap();

    assert_eq!(bundle.status, BundleStatus::Failed);
    assert_eq!(bundle.confidence, 0.0);
    assert_eq!(bundle.error, Some(ErrorKind::ExecutionError));
    assert!(bundle.rows.is_empty());
    assert!(bundle.document_hits.is_empty());
    assert_eq!(bundle.sql.as_deref(), Some("SELECT COUNT(*) FROM employees"));
    assert!(bundle.mapping.is_some());
    assert!(bundle.message.starts_with("Query execution failed: "));
    assert!(bundle.message.contains("no such table"));
}

// ----------------------------------------------------------------------------
// Documents
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_document_hits_attached() {
    let fixture = support::hr_database();
    let index = Arc::new(StaticIndex::default());
    let session = open(&fixture).await.with_documents(index.clone());

    let bundle = session
        .run_query("how many employees are there?", true)
        .await
        .unwrap();

    assert_eq!(bundle.document_hits.len(), 1);
    assert_eq!(bundle.document_hits[0].source, "handbook.pdf");
    assert_eq!(index.calls.load(Ordering::SeqCst), 1);

    // Not searched when the caller opts out
    let bundle = session
        .run_query("how many employees are there?", false)
        .await
        .unwrap();
    assert!(bundle.document_hits.is_empty());
    assert_eq!(index.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_document_search_failure_is_not_fatal() {
    let fixture = support::hr_database();
    let session = open(&fixture).await.with_documents(Arc::new(OfflineIndex));

    let bundle = session
        .run_query("how many employees are there?", true)
        .await
        .unwrap();

    assert!(bundle.is_success());
    assert!(bundle.document_hits.is_empty());
}

// ----------------------------------------------------------------------------
// explain / validate / suggestions
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_explain() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let explanation = session.explain("how many employees are there?").await.unwrap();

    assert_eq!(explanation.query_type, QueryType::Count);
    assert_eq!(explanation.sql.as_deref(), Some("SELECT COUNT(*) FROM employees"));
    assert_snapshot!(explanation.explanation, @"I interpreted your query 'how many employees are there?' as a count operation. I found these relevant tables: employees. This was converted to the SQL query: SELECT COUNT(*) FROM employees Confidence level: 64.0%");
}

#[tokio::test]
async fn test_validate() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let valid = session.validate("what is the average salary?").await.unwrap();
    assert!(valid.is_valid);
    assert_eq!(valid.sql.as_deref(), Some("SELECT AVG(salary) FROM employees"));
    assert_snapshot!(valid.message, @"Query validation complete with 66.0% confidence");

    let invalid = session.validate("what is the weather like today?").await.unwrap();
    assert!(!invalid.is_valid);
    assert!(invalid.sql.is_none());
    assert_snapshot!(invalid.message, @"Query validation complete with 0.0% confidence");
}

#[tokio::test]
async fn test_suggestions() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let suggestions = session.suggestions().await.unwrap();
    let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();

    assert_eq!(
        texts,
        vec![
            "List all departments",
            "Show departments with more than 10 employees",
            "How many employees are there?",
            "Show all employees hired in 2024",
            "List employees by department",
            "Show me recent data",
            "Find records with high values",
            "Group data by categories",
        ]
    );
    assert_eq!(suggestions[0].category, SuggestionCategory::List);
}

// ----------------------------------------------------------------------------
// Session lifecycle
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_schema_is_cached() {
    let fixture = support::hr_database();
    let session = open(&fixture).await;

    let first = session.schema().await.unwrap();
    let second = session.schema().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_session_over_existing_provider() {
    let fixture = support::hr_database();
    let provider = SqliteProvider::open(&fixture.locator()).unwrap();
    let session = QuerySession::new(
        provider,
        Arc::new(NamingPatterns::default()),
        Settings::default(),
    );

    let (mapping, sql) = session.synthesize("how many active employees").await.unwrap();
    assert_eq!(mapping.query_type, QueryType::Count);
    assert_eq!(sql.as_deref(), Some("SELECT COUNT(*) FROM employees WHERE status = 'active'"));

    let provider = session.close().unwrap();
    assert_eq!(provider.row_count("employees").unwrap(), support::EMPLOYEE_ROWS);
}

#[tokio::test]
async fn test_executes_in_connection_dialect() {
    let fixture = support::hr_database();
    let mut settings = Settings::default();
    settings.database.dialect = Dialect::Postgres;

    let session = QuerySession::<SqliteProvider>::open(&fixture.locator(), settings)
        .await
        .unwrap();
    assert_eq!(session.dialect(), Dialect::Sqlite);

    let bundle = session
        .run_query("show employees hired in 2023", false)
        .await
        .unwrap();
    assert!(bundle.is_success());
    assert_eq!(bundle.rows.len(), 3);
    assert_eq!(
        bundle.sql.as_deref(),
        Some("SELECT hire_date FROM employees WHERE strftime('%Y', hire_date) = '2023'")
    );

    // Other dialects are rendered on request, never executed
    let (_, sql) = session
        .render_sql("show employees hired in 2023", Dialect::Postgres)
        .await
        .unwrap();
    assert_eq!(
        sql.as_deref(),
        Some("SELECT hire_date FROM employees WHERE CAST(EXTRACT(YEAR FROM hire_date) AS TEXT) = '2023'")
    );
}

// ----------------------------------------------------------------------------
// Cancellation
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_queued_request_leaves_running_one_alone() {
    let fixture = support::hr_database();
    let (provider, mut gate) = gated(&fixture);
    let session = Arc::new(QuerySession::new(
        provider,
        Arc::new(NamingPatterns::default()),
        Settings::default(),
    ));
    session.schema().await.unwrap();

    let running = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.run_query("how many employees are there?", false).await }
    });
    gate.started.recv().await.unwrap();

    // Waits for the connection, then gives up
    let queued = tokio::time::timeout(
        Duration::from_millis(50),
        session.run_query("list employees and departments", false),
    )
    .await;
    assert!(queued.is_err());

    gate.release.send(()).unwrap();
    let bundle = running.await.unwrap().unwrap();

    assert_eq!(bundle.status, BundleStatus::Success);
    assert_eq!(bundle.rows[0]["COUNT(*)"], 9);
    assert_eq!(gate.interrupts.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_running_request_is_interrupted() {
    let fixture = support::hr_database();
    let (provider, mut gate) = gated(&fixture);
    let session = QuerySession::new(
        provider,
        Arc::new(NamingPatterns::default()),
        Settings::default(),
    );
    session.schema().await.unwrap();

    let request = session.run_query("how many employees are there?", false);
    let release = gate.release.clone();
    let cancelled = tokio::time::timeout(Duration::from_millis(200), async {
        let (bundle, _) = tokio::join!(request, gate.started.recv());
        bundle
    })
    .await;
    assert!(cancelled.is_err());
    assert_eq!(gate.interrupts.load(Ordering::SeqCst), 1);

    // Let the blocked statement finish; later requests still work
    release.send(()).unwrap();
    let bundle = session
        .run_query("how many employees are there?", false)
        .await
        .unwrap();
    assert_eq!(bundle.rows[0]["COUNT(*)"], 9);
    assert_eq!(gate.interrupts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_open_missing_database() {
    let result =
        QuerySession::<SqliteProvider>::open("/nonexistent/hr.db", Settings::default()).await;

    let err = result.err().unwrap();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_open_not_a_database() {
    let fixture = support::garbage_file();
    let result = QuerySession::<SqliteProvider>::open(&fixture.locator(), Settings::default()).await;

    assert_eq!(result.err().unwrap().kind(), ErrorKind::ConnectionError);
}

#[tokio::test]
async fn test_one_shot_run_query() {
    let fixture = support::hr_database();

    let bundle = nlq::run_query(
        "how many active employees",
        &fixture.locator(),
        false,
        Settings::default(),
    )
    .await
    .unwrap();

    assert_eq!(bundle.rows[0]["COUNT(*)"], 7);

    let err = nlq::run_query("how many employees", "/nonexistent/hr.db", false, Settings::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
