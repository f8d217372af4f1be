//! Vector store adapter.
//!
//! The corpus lives in an external key/vector store populated entirely by
//! the offline ingestion job; this core only reads it. The [`VectorStore`]
//! trait is the adapter contract: approximate nearest-neighbor queries over
//! one of the two embedding spaces, plus batched field fetches that deliver
//! vectors as binary blobs.
//!
//! The store's field maps are loosely typed on the wire, so [`FieldMap`]
//! decodes them at the boundary: text fields are UTF-8 validated and vector
//! fields are length-checked, with malformed values treated as absent data
//! (logged, never propagated as undefined values).
//!
//! [`InMemoryVectorStore`] is the reference implementation, used by tests
//! and by the CLI's snapshot mode.

mod memory;

pub use memory::InMemoryVectorStore;

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::vector;

/// Store field names, matching the ingestion job's hash schema.
pub mod fields {
    /// Article title (articles only).
    pub const TITLE: &str = "title";
    /// Article preview text.
    pub const PREVIEW: &str = "preview";
    /// Full article body.
    pub const BODY: &str = "body";
    /// Profile display alias (profiles only, may be blank).
    pub const ALIAS: &str = "alias";
    /// Contextual embedding blob (articles only).
    pub const CTX_VEC: &str = "ctx_vec";
    /// Ideological embedding blob (articles and profiles).
    pub const IDEO_VEC: &str = "ideo_vec";
}

/// The two embedding spaces the store indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    /// Topical/semantic meaning; first-stage retrieval. Articles only.
    Contextual,
    /// Alignment/stance; second-stage re-ranking. Articles and profiles.
    Ideological,
}

impl Space {
    /// The hash field holding this space's vector blob.
    pub fn vector_field(&self) -> &'static str {
        match self {
            Space::Contextual => fields::CTX_VEC,
            Space::Ideological => fields::IDEO_VEC,
        }
    }
}

/// One KNN match: node key plus cosine distance (lower = closer).
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Store key of the matched node (e.g. `article:abc123`).
    pub key: String,
    /// Cosine distance to the query vector.
    pub distance: f32,
}

/// Errors from vector store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store unreachable or the backend rejected the call.
    #[error("Vector store unavailable: {0}")]
    Unavailable(String),
    /// The bounded call timeout elapsed.
    #[error("Vector store request timed out")]
    Timeout,
    /// A record could not be decoded at all (corrupt batch payload).
    #[error("Malformed store record: {0}")]
    MalformedRecord(String),
}

/// Raw field values for one node, decoded lazily at the boundary.
///
/// A missing field is absent data, not an error: accessors return `Option`
/// and log when a present value is malformed.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    values: HashMap<String, Vec<u8>>,
}

impl FieldMap {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: adds a text field.
    pub fn with_text(mut self, field: &str, value: &str) -> Self {
        self.values.insert(field.to_string(), value.as_bytes().to_vec());
        self
    }

    /// Builder: adds a vector field, encoded as an f32le blob.
    pub fn with_vector(mut self, field: &str, value: &[f32]) -> Self {
        self.values.insert(field.to_string(), vector::encode(value));
        self
    }

    /// Inserts a raw field value.
    pub fn insert_raw(&mut self, field: &str, bytes: Vec<u8>) {
        self.values.insert(field.to_string(), bytes);
    }

    /// Whether the field is present at all.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Reads a text field, validating UTF-8.
    ///
    /// Returns `None` for absent fields; malformed UTF-8 is logged and
    /// treated as absent rather than lossily converted.
    pub fn text(&self, field: &str) -> Option<&str> {
        let bytes = self.values.get(field)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(field, error = %e, "Dropping non-UTF-8 text field");
                None
            }
        }
    }

    /// Reads a vector field, decoding the f32le blob.
    ///
    /// Returns `None` for absent fields; a truncated blob is logged and
    /// treated as absent so a single bad record never fails a whole batch.
    pub fn vector(&self, field: &str) -> Option<Vec<f32>> {
        let bytes = self.values.get(field)?;
        match vector::decode(bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(field, error = %e, "Dropping undecodable vector field");
                None
            }
        }
    }
}

/// Read-only adapter over the external key/vector store.
///
/// Implementations must not assume exclusive access: the store is shared
/// and read-mostly, and this core never writes through it.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// K-nearest-neighbor query in the given space, cosine metric.
    ///
    /// Returns up to `k` hits ordered ascending by distance.
    async fn query_knn(
        &self,
        space: Space,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<Hit>, StoreError>;

    /// Fetches the named fields for all keys in a single round trip.
    ///
    /// Keys absent from the store simply have no entry in the returned map;
    /// per-key missing fields are absent from that key's [`FieldMap`].
    /// Neither is an error.
    async fn batch_get_fields(
        &self,
        keys: &[String],
        field_names: &[&str],
    ) -> Result<HashMap<String, FieldMap>, StoreError>;
}
