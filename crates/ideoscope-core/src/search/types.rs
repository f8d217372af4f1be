//! Search result and error types.

use serde::Serialize;
use thiserror::Error;

use crate::error::EmbedError;
use crate::store::StoreError;

/// One ranked article from a completed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Store key of the article (e.g. `article:abc123`).
    pub key: String,
    /// First-stage cosine distance to the query (lower = closer).
    pub contextual_score: f32,
    /// Second-stage cosine similarity to the reference profile.
    ///
    /// `None` when the candidate has no ideological vector, when its vector
    /// is incomparable with the reference, or when no reference was ranked
    /// against. `None` never participates in numeric ordering.
    pub ideological_score: Option<f32>,
    /// Article title; empty when the record carried none.
    pub title: String,
    /// Preview text; empty when absent.
    pub preview: String,
    /// Full body text; empty when absent.
    pub body: String,
}

/// Errors from a search pipeline run.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The embedding service failed or timed out; the query cannot proceed.
    #[error("Embedding failed: {0}")]
    EmbeddingUnavailable(String),
    /// The vector store failed or timed out.
    #[error("Vector store failed: {0}")]
    StoreUnavailable(String),
    /// The query is empty or whitespace-only; rejected before any I/O.
    #[error("Query is empty")]
    InvalidQuery,
    /// The embedder produced a vector of the wrong length for the
    /// contextual index.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the contextual index was built with.
        expected: usize,
        /// Dimension the embedder returned.
        actual: usize,
    },
}

impl From<EmbedError> for SearchError {
    fn from(err: EmbedError) -> Self {
        SearchError::EmbeddingUnavailable(err.to_string())
    }
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        SearchError::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_store_unavailable() {
        let err: SearchError = StoreError::Timeout.into();
        assert!(matches!(err, SearchError::StoreUnavailable(_)));
    }

    #[test]
    fn test_embed_error_maps_to_embedding_unavailable() {
        let err: SearchError = EmbedError::Timeout.into();
        assert!(matches!(err, SearchError::EmbeddingUnavailable(_)));
    }

    #[test]
    fn test_result_serializes_null_ideological_score() {
        let result = SearchResult {
            key: "article:a".to_string(),
            contextual_score: 0.12,
            ideological_score: None,
            title: "T".to_string(),
            preview: String::new(),
            body: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["ideological_score"].is_null());
    }
}
