//! Spatial graph assembly.
//!
//! The offline ingestion job projects every node into 3D and writes a
//! position artifact (JSON). The renderable graph merges that artifact
//! with display labels fetched from the store: coordinates and membership
//! come from the artifact, labels come from the store, and the artifact's
//! insertion order is preserved end to end so the same artifact always
//! yields the same scene.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config;
use crate::store::{fields, StoreError, VectorStore};

/// The two node populations in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A published article; lives in both embedding spaces.
    Article,
    /// A reader/author profile; ideological space only.
    Profile,
}

/// One entry of the position artifact, as the ingestion job wrote it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtifactEntry {
    /// Raw (unscaled) coordinates.
    pub x: f32,
    /// Raw (unscaled) coordinates.
    pub y: f32,
    /// Raw (unscaled) coordinates.
    pub z: f32,
    /// Node population.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Bare id without the key prefix.
    pub id: String,
}

/// Parsed position artifact, preserving the file's key order.
#[derive(Debug, Clone, Default)]
pub struct PositionArtifact {
    entries: Vec<(String, ArtifactEntry)>,
}

/// Errors parsing the position artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The document is not valid JSON or lacks the `positions` object.
    #[error("Invalid position artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    positions: serde_json::Map<String, serde_json::Value>,
}

impl PositionArtifact {
    /// Parses the artifact document.
    ///
    /// Individual entries that fail to deserialize are skipped with a
    /// warning; one corrupt entry does not invalidate the artifact.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.positions.len());
        for (key, value) in raw.positions {
            match serde_json::from_value::<ArtifactEntry>(value) {
                Ok(entry) => entries.push((key, entry)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping malformed artifact entry");
                }
            }
        }
        Ok(Self { entries })
    }

    /// Entries in artifact order.
    pub fn entries(&self) -> &[(String, ArtifactEntry)] {
        &self.entries
    }

    /// Number of (valid) entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the artifact holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One renderable node: artifact position, store label, scaled coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Full store key (e.g. `article:abc123`).
    pub key: String,
    /// Bare id from the artifact.
    pub id: String,
    /// Node population.
    pub kind: NodeKind,
    /// Display label (store title/alias, or truncated-id fallback).
    pub label: String,
    /// Scaled render coordinate.
    pub x: f32,
    /// Scaled render coordinate.
    pub y: f32,
    /// Scaled render coordinate.
    pub z: f32,
}

/// Assembles renderable graphs from a position artifact and the store.
pub struct GraphBuilder<'a, S> {
    store: &'a S,
}

impl<'a, S: VectorStore> GraphBuilder<'a, S> {
    /// Creates a builder over the given store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Builds the renderable node list.
    ///
    /// One batched label fetch covers every artifact key; nodes whose
    /// records are absent fall back to truncated-id labels. Output order is
    /// the artifact's order.
    pub async fn build(&self, artifact: &PositionArtifact) -> Result<Vec<GraphNode>, StoreError> {
        if artifact.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = artifact.entries().iter().map(|(k, _)| k.clone()).collect();
        let records = timeout(
            config::STORE_TIMEOUT,
            self.store
                .batch_get_fields(&keys, &[fields::TITLE, fields::ALIAS]),
        )
        .await
        .map_err(|_| StoreError::Timeout)??;
        debug!(
            nodes = artifact.len(),
            labeled = records.len(),
            "Fetched graph labels"
        );

        let mut nodes = Vec::with_capacity(artifact.len());
        for (key, entry) in artifact.entries() {
            let record = records.get(key);
            let label = match entry.kind {
                NodeKind::Article => record
                    .and_then(|f| f.text(fields::TITLE))
                    .filter(|t| !t.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_label(&entry.id, config::ARTICLE_LABEL_CHARS)),
                NodeKind::Profile => record
                    .and_then(|f| f.text(fields::ALIAS))
                    .filter(|a| !a.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_label(&entry.id, config::PROFILE_LABEL_CHARS)),
            };

            nodes.push(GraphNode {
                key: key.clone(),
                id: entry.id.clone(),
                kind: entry.kind,
                label,
                x: entry.x * config::POSITION_SCALE,
                y: entry.y * config::POSITION_SCALE,
                z: entry.z * config::POSITION_SCALE,
            });
        }
        Ok(nodes)
    }
}

/// Truncated-id fallback label, always suffixed with an ellipsis.
fn fallback_label(id: &str, chars: usize) -> String {
    let prefix: String = id.chars().take(chars).collect();
    format!("{prefix}…")
}
