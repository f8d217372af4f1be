//! In-memory vector store for tests and snapshot-backed CLI runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::warn;

use super::{FieldMap, Hit, Space, StoreError, VectorStore};
use crate::vector;

/// Exact-scan implementation of [`VectorStore`].
///
/// Ranks by true cosine distance over every node carrying the queried
/// space's vector, which is the ordering the production store's ANN index
/// approximates. Nothing is persisted.
///
/// `fail_next()` arms one-shot fault injection so tests can exercise the
/// `Unavailable` path without a network.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    nodes: RwLock<HashMap<String, FieldMap>>,
    fail_next: AtomicBool,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) a node's fields.
    pub fn put_node(&self, key: &str, fields: FieldMap) {
        if let Ok(mut nodes) = self.nodes.write() {
            nodes.insert(key.to_string(), fields);
        }
    }

    /// Number of nodes in the store.
    pub fn len(&self) -> usize {
        self.nodes.read().map(|n| n.len()).unwrap_or(0)
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arms the store to fail its next call with `Unavailable`.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn check_fault(&self) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected fault".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query_knn(
        &self,
        space: Space,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<Hit>, StoreError> {
        self.check_fault()?;

        let nodes = self
            .nodes
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Lock poisoned: {}", e)))?;

        let field = space.vector_field();
        let mut hits: Vec<Hit> = Vec::new();
        for (key, fields) in nodes.iter() {
            let Some(candidate) = fields.vector(field) else {
                continue;
            };
            match vector::cosine_distance(query, &candidate) {
                Some(distance) => hits.push(Hit {
                    key: key.clone(),
                    distance,
                }),
                None => {
                    // Wrong dimensionality or zero norm: excluded from the
                    // result set, never compared truncated.
                    warn!(key = %key, field, "Skipping incomparable vector in KNN scan");
                }
            }
        }

        // Ascending distance; key as the tie-break keeps identical inputs
        // producing identical output order.
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn batch_get_fields(
        &self,
        keys: &[String],
        field_names: &[&str],
    ) -> Result<HashMap<String, FieldMap>, StoreError> {
        self.check_fault()?;

        let nodes = self
            .nodes
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Lock poisoned: {}", e)))?;

        let mut out = HashMap::with_capacity(keys.len());
        for key in keys {
            let Some(stored) = nodes.get(key) else {
                continue; // absent node, not an error
            };
            let mut selected = FieldMap::new();
            for &name in field_names {
                if let Some(bytes) = stored.values.get(name) {
                    selected.insert_raw(name, bytes.clone());
                }
            }
            out.insert(key.clone(), selected);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fields;

    fn seeded_store() -> InMemoryVectorStore {
        let store = InMemoryVectorStore::new();
        store.put_node(
            "article:a",
            FieldMap::new()
                .with_text(fields::TITLE, "Alpha")
                .with_vector(fields::CTX_VEC, &[1.0, 0.0, 0.0]),
        );
        store.put_node(
            "article:b",
            FieldMap::new()
                .with_text(fields::TITLE, "Beta")
                .with_vector(fields::CTX_VEC, &[0.9, 0.1, 0.0]),
        );
        store.put_node(
            "article:c",
            FieldMap::new()
                .with_text(fields::TITLE, "Gamma")
                .with_vector(fields::CTX_VEC, &[0.0, 1.0, 0.0]),
        );
        store
    }

    #[tokio::test]
    async fn test_knn_orders_by_ascending_distance() {
        let store = seeded_store();
        let hits = store
            .query_knn(Space::Contextual, &[1.0, 0.0, 0.0], 3)
            .await
            .unwrap();
        let keys: Vec<_> = hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["article:a", "article:b", "article:c"]);
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[tokio::test]
    async fn test_knn_truncates_to_k() {
        let store = seeded_store();
        let hits = store
            .query_knn(Space::Contextual, &[1.0, 0.0, 0.0], 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_knn_skips_nodes_without_the_space_vector() {
        let store = seeded_store();
        store.put_node(
            "profile:p",
            FieldMap::new().with_vector(fields::IDEO_VEC, &[1.0, 0.0, 0.0]),
        );
        let hits = store
            .query_knn(Space::Contextual, &[1.0, 0.0, 0.0], 10)
            .await
            .unwrap();
        assert!(hits.iter().all(|h| h.key.starts_with("article:")));
    }

    #[tokio::test]
    async fn test_knn_skips_mixed_length_vectors() {
        let store = seeded_store();
        store.put_node(
            "article:bad",
            FieldMap::new().with_vector(fields::CTX_VEC, &[1.0, 0.0]), // wrong dim
        );
        let hits = store
            .query_knn(Space::Contextual, &[1.0, 0.0, 0.0], 10)
            .await
            .unwrap();
        assert!(!hits.iter().any(|h| h.key == "article:bad"));
    }

    #[tokio::test]
    async fn test_batch_get_skips_absent_keys() {
        let store = seeded_store();
        let keys = vec!["article:a".to_string(), "article:ghost".to_string()];
        let map = store
            .batch_get_fields(&keys, &[fields::TITLE])
            .await
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["article:a"].text(fields::TITLE), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_batch_get_selects_only_requested_fields() {
        let store = seeded_store();
        let keys = vec!["article:a".to_string()];
        let map = store
            .batch_get_fields(&keys, &[fields::TITLE])
            .await
            .unwrap();
        assert!(!map["article:a"].contains(fields::CTX_VEC));
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = seeded_store();
        store.fail_next();
        let err = store
            .query_knn(Space::Contextual, &[1.0, 0.0, 0.0], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        // Next call succeeds again.
        assert!(store
            .query_knn(Space::Contextual, &[1.0, 0.0, 0.0], 1)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_identical_queries_produce_identical_order() {
        let store = seeded_store();
        let first = store
            .query_knn(Space::Contextual, &[0.5, 0.5, 0.0], 3)
            .await
            .unwrap();
        let second = store
            .query_knn(Space::Contextual, &[0.5, 0.5, 0.0], 3)
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
