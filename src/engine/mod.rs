//! Query orchestration.
//!
//! ```text
//! question ──▶ QuerySession
//!                 │ schema()      analyze once, cache the snapshot
//!                 │ map_query     relevance + intent + confidence
//!                 │ synthesize    SQL text or none
//!                 │ execute       rows, or a failed bundle
//!                 │ documents     optional external search
//!                 ▼
//!             ResultBundle
//! ```

mod bundle;
mod documents;
mod error;
mod session;
mod suggestions;

pub use bundle::{BundleStatus, QueryExplanation, QueryValidation, ResultBundle};
pub use documents::{DocumentHit, DocumentSearch, DocumentSearchError};
pub use error::{EngineError, EngineResult};
pub use session::QuerySession;
pub use suggestions::{suggest_queries, QuerySuggestion, SuggestionCategory, MAX_SUGGESTIONS};

use crate::config::Settings;
use crate::metadata::SqliteProvider;

/// Answer one question against the SQLite database at `locator`.
///
/// Opens a session, runs the request and closes the connection again.
pub async fn run_query(
    text: &str,
    locator: &str,
    include_documents: bool,
    settings: Settings,
) -> EngineResult<ResultBundle> {
    let session = QuerySession::<SqliteProvider>::open(locator, settings).await?;
    let bundle = session.run_query(text, include_documents).await;
    session.close();
    bundle
}
