//! Corpus snapshot loading.
//!
//! The ingestion pipeline can dump the store as a JSON snapshot so the CLI
//! can run fully offline against an [`InMemoryVectorStore`]. One snapshot
//! entry per node; every field is optional, matching the store's
//! missing-field-is-absent-data semantics.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::info;

use ideoscope_core::store::{fields, FieldMap, InMemoryVectorStore};

#[derive(Debug, Deserialize)]
struct Snapshot {
    nodes: HashMap<String, SnapshotNode>,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotNode {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    alias: Option<String>,
    #[serde(default)]
    ctx_vec: Option<Vec<f32>>,
    #[serde(default)]
    ideo_vec: Option<Vec<f32>>,
}

/// Loads a snapshot file into an in-memory store.
pub fn load_snapshot(path: &Path) -> Result<InMemoryVectorStore> {
    if !path.exists() {
        return Err(anyhow!(
            "No corpus snapshot found at {}.\n\
             Export one with the ingestion pipeline, or point --snapshot at it.",
            path.display()
        ));
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid snapshot JSON: {}", path.display()))?;

    let store = InMemoryVectorStore::new();
    for (key, node) in snapshot.nodes {
        let mut map = FieldMap::new();
        if let Some(title) = &node.title {
            map = map.with_text(fields::TITLE, title);
        }
        if let Some(preview) = &node.preview {
            map = map.with_text(fields::PREVIEW, preview);
        }
        if let Some(body) = &node.body {
            map = map.with_text(fields::BODY, body);
        }
        if let Some(alias) = &node.alias {
            map = map.with_text(fields::ALIAS, alias);
        }
        if let Some(ctx) = &node.ctx_vec {
            map = map.with_vector(fields::CTX_VEC, ctx);
        }
        if let Some(ideo) = &node.ideo_vec {
            map = map.with_vector(fields::IDEO_VEC, ideo);
        }
        store.put_node(&key, map);
    }

    info!(nodes = store.len(), "Loaded corpus snapshot");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_snapshot() {
        let file = write_snapshot(
            r#"{"nodes": {
                "article:a": {
                    "title": "Alpha",
                    "preview": "p",
                    "body": "b",
                    "ctx_vec": [1.0, 0.0],
                    "ideo_vec": [0.5, 0.5]
                },
                "profile:p": {"alias": "reader", "ideo_vec": [1.0, 0.0]}
            }}"#,
        );
        let store = load_snapshot(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_missing_snapshot_is_an_error() {
        let err = load_snapshot(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(err.to_string().contains("No corpus snapshot"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let file = write_snapshot("not json");
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid snapshot JSON"));
    }
}
