//! Document search collaborator.
//!
//! Sessions can attach an external full-text or vector index that is queried
//! with the raw question alongside the SQL path. Its failures never fail the
//! request: they are logged and the bundle carries no hits.

use async_trait::async_trait;
use serde::Serialize;

/// A document excerpt returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentHit {
    /// Where the excerpt came from (file name, URL, ...).
    pub source: String,
    pub excerpt: String,
    /// Similarity to the query in [0, 1].
    pub similarity: f64,
}

/// Errors raised by a document search backend.
#[derive(Debug, thiserror::Error)]
pub enum DocumentSearchError {
    #[error("Document index unavailable: {0}")]
    Unavailable(String),

    #[error("Document search failed: {0}")]
    Failed(String),
}

/// A searchable document index.
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Return at most `top_k` hits for `text`, most similar first.
    async fn search(&self, text: &str, top_k: usize)
        -> Result<Vec<DocumentHit>, DocumentSearchError>;
}
