//! Configuration and path resolution for the CLI.
//!
//! The CLI works off two local files produced by the ingestion pipeline: a
//! corpus snapshot (node fields and vectors) and a position artifact. Both
//! resolve flag first, then environment variable, then the platform data
//! directory.

use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

use ideoscope_core::embedding::OpenAiEmbedder;

/// Default file names inside the data directory.
const SNAPSHOT_FILENAME: &str = "snapshot.json";
const POSITIONS_FILENAME: &str = "positions.json";

/// Environment variable overrides.
const SNAPSHOT_ENV: &str = "IDEOSCOPE_SNAPSHOT";
const POSITIONS_ENV: &str = "IDEOSCOPE_POSITIONS";
const API_KEY_ENV: &str = "OPENAI_API_KEY";
const EMBED_ENDPOINT_ENV: &str = "IDEOSCOPE_EMBED_ENDPOINT";
const EMBED_MODEL_ENV: &str = "IDEOSCOPE_EMBED_MODEL";

/// Returns the platform data directory.
///
/// - macOS: `~/Library/Application Support/dev.ideoscope.Ideoscope/`
/// - Linux: `~/.local/share/ideoscope/`
fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("dev", "ideoscope", "Ideoscope")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine data directory"))
}

fn resolve(custom: Option<&PathBuf>, env: &str, filename: &str) -> Result<PathBuf> {
    if let Some(path) = custom {
        return Ok(path.clone());
    }
    if let Ok(path) = std::env::var(env) {
        return Ok(PathBuf::from(path));
    }
    Ok(data_dir()?.join(filename))
}

/// Path to the corpus snapshot file.
pub fn snapshot_path(custom: Option<&PathBuf>) -> Result<PathBuf> {
    resolve(custom, SNAPSHOT_ENV, SNAPSHOT_FILENAME)
}

/// Path to the position artifact file.
pub fn positions_path(custom: Option<&PathBuf>) -> Result<PathBuf> {
    resolve(custom, POSITIONS_ENV, POSITIONS_FILENAME)
}

/// Builds the query embedder from the environment.
///
/// Requires `$OPENAI_API_KEY`; `$IDEOSCOPE_EMBED_ENDPOINT` and
/// `$IDEOSCOPE_EMBED_MODEL` override the production defaults (useful for
/// local OpenAI-compatible servers).
pub fn embedder_from_env() -> Result<OpenAiEmbedder> {
    let api_key = std::env::var(API_KEY_ENV)
        .map_err(|_| anyhow!("${} is not set; it is required for search", API_KEY_ENV))?;
    let endpoint = std::env::var(EMBED_ENDPOINT_ENV).ok();
    let model = std::env::var(EMBED_MODEL_ENV).ok();

    OpenAiEmbedder::new(api_key, model, endpoint, None)
        .map_err(|e| anyhow!("Failed to build embedding client: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_path_wins() {
        let custom = PathBuf::from("/tmp/custom-snapshot.json");
        let path = snapshot_path(Some(&custom)).unwrap();
        assert_eq!(path, custom);
    }

    #[test]
    fn test_default_paths_use_known_filenames() {
        // Only check the filename; the directory is platform-specific.
        if std::env::var(SNAPSHOT_ENV).is_err() {
            let path = snapshot_path(None).unwrap();
            assert!(path.ends_with(SNAPSHOT_FILENAME));
        }
        if std::env::var(POSITIONS_ENV).is_err() {
            let path = positions_path(None).unwrap();
            assert!(path.ends_with(POSITIONS_FILENAME));
        }
    }
}
