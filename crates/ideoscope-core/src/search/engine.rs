//! The retrieval-rerank pipeline.

use std::cmp::Ordering;

use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::types::{SearchError, SearchResult};
use crate::config::EngineConfig;
use crate::embedding::QueryEmbedder;
use crate::error::EmbedError;
use crate::store::{fields, Hit, Space, StoreError, VectorStore};
use crate::vector;

/// Two-stage search engine: contextual recall, ideological re-rank.
///
/// The engine is stateless between calls; concurrent searches share the
/// store and embedder without coordination. Staleness of overlapping
/// searches is the session layer's concern, not the engine's.
pub struct RetrievalEngine<S, E> {
    store: S,
    embedder: E,
    config: EngineConfig,
}

impl<S: VectorStore, E: QueryEmbedder> RetrievalEngine<S, E> {
    /// Creates an engine over the given store and embedder.
    pub fn new(store: S, embedder: E, config: EngineConfig) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the full pipeline for one query.
    ///
    /// When `reference_key` names a profile whose ideological vector is
    /// present, results are ordered by descending ideological similarity
    /// with unscorable candidates last. When the reference or its vector is
    /// absent the contextual KNN order is returned unchanged; that is a
    /// degraded ranking, not an error.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidQuery`] for empty or whitespace-only queries
    /// - [`SearchError::EmbeddingUnavailable`] when the embedder fails or
    ///   times out
    /// - [`SearchError::DimensionMismatch`] when the embedder's output does
    ///   not fit the contextual index
    /// - [`SearchError::StoreUnavailable`] when either store round trip
    ///   fails or times out
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn search(
        &self,
        query: &str,
        reference_key: Option<&str>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let query_vec = timeout(self.config.embed_timeout, self.embedder.embed(query))
            .await
            .map_err(|_| EmbedError::Timeout)??;
        if query_vec.len() != self.config.contextual_dim {
            return Err(SearchError::DimensionMismatch {
                expected: self.config.contextual_dim,
                actual: query_vec.len(),
            });
        }

        let hits = timeout(
            self.config.store_timeout,
            self.store
                .query_knn(Space::Contextual, &query_vec, self.config.candidates),
        )
        .await
        .map_err(|_| StoreError::Timeout)??;
        debug!(candidates = hits.len(), "Contextual recall complete");

        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let reference_vec = match reference_key {
            Some(key) => self.fetch_reference_vector(key).await?,
            None => None,
        };

        let mut results = self.fetch_candidates(&hits, reference_vec.as_deref()).await?;

        if reference_vec.is_some() {
            // Stable sort keeps the contextual order within ties and within
            // the unscorable tail.
            results.sort_by(|a, b| match (a.ideological_score, b.ideological_score) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
            info!(results = results.len(), "Search ranked against reference");
        } else {
            info!(results = results.len(), "Search returned in contextual order");
        }

        Ok(results)
    }

    /// Fetches the reference profile's ideological vector.
    ///
    /// An absent profile or absent vector degrades to `None` (unranked
    /// results) rather than failing the search; only a store failure
    /// propagates.
    async fn fetch_reference_vector(&self, key: &str) -> Result<Option<Vec<f32>>, SearchError> {
        let keys = vec![key.to_string()];
        let records = timeout(
            self.config.store_timeout,
            self.store.batch_get_fields(&keys, &[fields::IDEO_VEC]),
        )
        .await
        .map_err(|_| StoreError::Timeout)??;

        let vec = records.get(key).and_then(|f| f.vector(fields::IDEO_VEC));
        if vec.is_none() {
            warn!(reference = key, "Reference has no ideological vector; returning unranked results");
        }
        Ok(vec)
    }

    /// Fetches candidate metadata in one round trip and scores each against
    /// the reference vector when one is present.
    async fn fetch_candidates(
        &self,
        hits: &[Hit],
        reference_vec: Option<&[f32]>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let keys: Vec<String> = hits.iter().map(|h| h.key.clone()).collect();
        let wanted: &[&str] = if reference_vec.is_some() {
            &[fields::TITLE, fields::PREVIEW, fields::BODY, fields::IDEO_VEC]
        } else {
            &[fields::TITLE, fields::PREVIEW, fields::BODY]
        };

        let records = timeout(
            self.config.store_timeout,
            self.store.batch_get_fields(&keys, wanted),
        )
        .await
        .map_err(|_| StoreError::Timeout)??;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let record = records.get(&hit.key);
            if record.is_none() {
                // Candidate vanished between KNN and fetch; keep the hit
                // with empty metadata rather than dropping it.
                warn!(key = %hit.key, "Candidate record missing from batch fetch");
            }

            let ideological_score = match (reference_vec, record) {
                (Some(reference), Some(fields_map)) => fields_map
                    .vector(fields::IDEO_VEC)
                    .and_then(|v| vector::cosine_similarity(&v, reference)),
                _ => None,
            };

            results.push(SearchResult {
                key: hit.key.clone(),
                contextual_score: hit.distance,
                ideological_score,
                title: record
                    .and_then(|f| f.text(fields::TITLE))
                    .unwrap_or_default()
                    .to_string(),
                preview: record
                    .and_then(|f| f.text(fields::PREVIEW))
                    .unwrap_or_default()
                    .to_string(),
                body: record
                    .and_then(|f| f.text(fields::BODY))
                    .unwrap_or_default()
                    .to_string(),
            });
        }
        Ok(results)
    }
}
