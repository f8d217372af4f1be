//! Shared error types.
//!
//! Component-local errors ([`crate::store::StoreError`],
//! [`crate::search::SearchError`], [`crate::graph::ArtifactError`]) live
//! with their modules; this module holds the errors that cross module
//! boundaries: embedding failures and binary codec failures.

use thiserror::Error;

/// Errors from the embedding service.
///
/// All variants are fatal to the query that triggered them; the engine maps
/// them to [`SearchError::EmbeddingUnavailable`](crate::search::SearchError).
#[derive(Debug, Clone, Error)]
pub enum EmbedError {
    /// Service unreachable, rejected the request, or returned garbage.
    #[error("Embedding service unavailable: {0}")]
    Unavailable(String),
    /// The bounded call timeout elapsed.
    #[error("Embedding request timed out")]
    Timeout,
}

/// Errors from the binary vector codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Blob length is not a whole number of f32 values.
    #[error("Vector blob length {0} is not a multiple of 4")]
    TruncatedBlob(usize),
}
