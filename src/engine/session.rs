//! Query session.
//!
//! A [`QuerySession`] owns one database connection and caches the schema
//! snapshot for its lifetime. Database work runs on tokio's blocking pool;
//! mapping and synthesis are pure and run inline.

use std::sync::{Arc, PoisonError};
use std::time::Instant;

use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;

use super::bundle::{QueryExplanation, QueryValidation, ResultBundle};
use super::documents::{DocumentHit, DocumentSearch};
use super::error::{EngineError, EngineResult};
use super::suggestions::{suggest_queries, QuerySuggestion};
use crate::config::{NamingPatterns, Settings};
use crate::error::ErrorKind;
use crate::metadata::{Interrupter, MetadataProvider, Row};
use crate::schema::{analyze_provider, SchemaSnapshot};
use crate::semantic::{map_query, QueryMapping};
use crate::sql::{Dialect, SqlSynthesizer};

/// Whether one database call still occupies the connection.
///
/// Flipped to false before the call releases the connection, so an interrupt
/// issued while it reads true can only reach that call's statement.
#[derive(Default)]
struct CallState(std::sync::Mutex<bool>);

impl CallState {
    fn set_running(&self, running: bool) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = running;
    }
}

/// Interrupts the in-flight database call if dropped while armed.
///
/// Dropping a session future mid-await leaves its blocking task running;
/// this stops the statement it is executing. Calls that never got the
/// connection, or already gave it back, are left alone.
struct InterruptOnDrop<'a> {
    interrupter: Option<&'a Interrupter>,
    call: Arc<CallState>,
}

impl<'a> InterruptOnDrop<'a> {
    fn arm(interrupter: Option<&'a Interrupter>, call: Arc<CallState>) -> Self {
        Self { interrupter, call }
    }

    fn disarm(mut self) {
        self.interrupter = None;
    }
}

impl Drop for InterruptOnDrop<'_> {
    fn drop(&mut self) {
        let Some(interrupter) = self.interrupter else {
            return;
        };

        // Held across the interrupt so the call cannot hand the connection on
        let running = self.call.0.lock().unwrap_or_else(PoisonError::into_inner);
        if *running {
            log::debug!("Request cancelled, interrupting database call");
            interrupter.interrupt();
        }
    }
}

/// One connection, one cached schema, many questions.
///
/// # Example
///
/// ```ignore
/// use nlq::config::Settings;
/// use nlq::engine::QuerySession;
/// use nlq::metadata::SqliteProvider;
///
/// let session = QuerySession::<SqliteProvider>::open("./hr.db", Settings::default()).await?;
/// let bundle = session.run_query("how many employees are there?", false).await?;
/// println!("{:?}", bundle.rows);
/// ```
pub struct QuerySession<P: MetadataProvider + 'static> {
    provider: Arc<Mutex<P>>,
    interrupter: Option<Interrupter>,
    dialect: Dialect,
    snapshot: OnceCell<Arc<SchemaSnapshot>>,
    patterns: Arc<NamingPatterns>,
    settings: Settings,
    documents: Option<Arc<dyn DocumentSearch>>,
}

impl<P: MetadataProvider + 'static> QuerySession<P> {
    /// Connect to the database at `locator`.
    pub async fn open(locator: &str, settings: Settings) -> EngineResult<Self> {
        let patterns = Arc::new(settings.naming_patterns()?);

        let owned = locator.to_string();
        let provider = tokio::task::spawn_blocking(move || P::open(&owned))
            .await?
            .map_err(|e| {
                log::error!("Failed to connect to database {}: {}", locator, e);
                EngineError::from(e)
            })?;

        Ok(Self::new(provider, patterns, settings))
    }

    /// Wrap an already open provider.
    pub fn new(provider: P, patterns: Arc<NamingPatterns>, settings: Settings) -> Self {
        let interrupter = provider.interrupter();
        let dialect = provider.dialect();
        if dialect != settings.database.dialect {
            log::debug!(
                "Executing {} SQL; {} is used for rendering only",
                dialect,
                settings.database.dialect
            );
        }

        Self {
            provider: Arc::new(Mutex::new(provider)),
            interrupter,
            dialect,
            snapshot: OnceCell::new(),
            patterns,
            settings,
            documents: None,
        }
    }

    /// Attach a document index searched alongside the database.
    pub fn with_documents(mut self, documents: Arc<dyn DocumentSearch>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The schema snapshot, analyzing the database on first use.
    pub async fn schema(&self) -> EngineResult<Arc<SchemaSnapshot>> {
        self.snapshot
            .get_or_try_init(|| async {
                let patterns = Arc::clone(&self.patterns);
                let analysis = self.settings.analysis.clone();

                let snapshot = self
                    .blocking(move |provider| analyze_provider(provider, &patterns, &analysis))
                    .await??;

                Ok::<_, EngineError>(Arc::new(snapshot))
            })
            .await
            .cloned()
    }

    /// Map a question onto the schema.
    pub async fn map_query(&self, text: &str) -> EngineResult<QueryMapping> {
        let snapshot = self.schema().await?;
        Ok(map_query(text, &snapshot))
    }

    /// Map a question and synthesize its SQL, in the connection's dialect,
    /// without running it.
    pub async fn synthesize(&self, text: &str) -> EngineResult<(QueryMapping, Option<String>)> {
        self.render_sql(text, self.dialect).await
    }

    /// Map a question and render its SQL in `dialect`.
    ///
    /// The result is for display; only the connection's own dialect is ever
    /// executed.
    pub async fn render_sql(
        &self,
        text: &str,
        dialect: Dialect,
    ) -> EngineResult<(QueryMapping, Option<String>)> {
        let snapshot = self.schema().await?;
        let mapping = map_query(text, &snapshot);
        let sql = SqlSynthesizer::from_settings(dialect, &self.settings.query)
            .with_schema(&snapshot)
            .synthesize(text, &mapping);
        Ok((mapping, sql))
    }

    /// Dialect the connection executes.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Answer a question: map, synthesize, execute and optionally search
    /// documents.
    ///
    /// Only schema analysis failures are returned as errors. A statement that
    /// fails to execute yields a failed bundle with zero confidence.
    pub async fn run_query(&self, text: &str, include_documents: bool) -> EngineResult<ResultBundle> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        log::info!("[{}] Processing query: {}", request_id, text);

        let (mapping, sql) = self.synthesize(text).await?;

        let mut rows = Vec::new();
        if let Some(sql) = &sql {
            match self.execute(sql).await {
                Ok(result) => {
                    log::info!("[{}] SQL query returned {} rows", request_id, result.len());
                    rows = result;
                }
                Err(reason) => {
                    log::error!(
                        "[{}] [{}] Query execution failed: {}",
                        request_id,
                        ErrorKind::ExecutionError,
                        reason
                    );
                    let elapsed = started.elapsed().as_secs_f64();
                    return Ok(ResultBundle::failed(
                        request_id,
                        Some(sql.clone()),
                        mapping,
                        elapsed,
                        &reason,
                    ));
                }
            }
        }

        let document_hits = if include_documents {
            self.search_documents(text).await
        } else {
            Vec::new()
        };

        let elapsed = started.elapsed().as_secs_f64();
        Ok(ResultBundle::completed(
            request_id,
            sql,
            rows,
            document_hits,
            mapping,
            elapsed,
        ))
    }

    /// Describe how a question would be processed.
    pub async fn explain(&self, text: &str) -> EngineResult<QueryExplanation> {
        let (mapping, sql) = self.synthesize(text).await?;
        Ok(QueryExplanation::new(mapping, sql))
    }

    /// Check whether a question can be turned into SQL.
    pub async fn validate(&self, text: &str) -> EngineResult<QueryValidation> {
        let (mapping, sql) = self.synthesize(text).await?;
        Ok(QueryValidation::new(mapping, sql))
    }

    /// Sample questions for this database.
    pub async fn suggestions(&self) -> EngineResult<Vec<QuerySuggestion>> {
        let snapshot = self.schema().await?;
        Ok(suggest_queries(&snapshot))
    }

    /// Close the session, handing the connection back.
    ///
    /// Returns `None` if a cancelled request still holds the connection.
    pub fn close(self) -> Option<P> {
        log::info!("Closing query session");
        Arc::try_unwrap(self.provider).ok().map(Mutex::into_inner)
    }

    /// Execute `sql`, returning the failure reason as text.
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, String> {
        let sql = sql.to_string();
        match self.blocking(move |provider| provider.execute(&sql)).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    async fn search_documents(&self, text: &str) -> Vec<DocumentHit> {
        let Some(documents) = &self.documents else {
            return Vec::new();
        };

        match documents.search(text, self.settings.query.document_top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Document search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Run `f` against the provider on the blocking pool.
    ///
    /// The connection is acquired before the interrupt guard is armed, so a
    /// request cancelled while queued never touches another request's
    /// statement.
    async fn blocking<R, F>(&self, f: F) -> EngineResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&P) -> R + Send + 'static,
    {
        let provider = Arc::clone(&self.provider).lock_owned().await;

        let call = Arc::new(CallState::default());
        call.set_running(true);
        let guard = InterruptOnDrop::arm(self.interrupter.as_ref(), Arc::clone(&call));

        let result = tokio::task::spawn_blocking(move || {
            let result = f(&provider);
            call.set_running(false);
            drop(provider);
            result
        })
        .await;

        guard.disarm();
        Ok(result?)
    }
}
