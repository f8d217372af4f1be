//! Two-stage retrieval and ranking.
//!
//! Stage one embeds the query and recalls a fixed-size candidate set by
//! contextual KNN. Stage two re-ranks those candidates by ideological
//! cosine similarity against a reference profile's vector, when one is
//! available; without a reference vector the contextual order stands.
//!
//! The pipeline is fail-fast on infrastructure (embedding service or store
//! down) and degrade-gracefully on data (missing fields, absent records).

mod engine;
mod types;

pub use engine::RetrievalEngine;
pub use types::{SearchError, SearchResult};
