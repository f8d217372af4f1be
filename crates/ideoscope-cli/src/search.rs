//! Search command implementation.
//!
//! Loads the corpus snapshot, embeds the query through the configured
//! service, and drives a [`SearchSession`] through its full lifecycle the
//! way the spatial UI does: submit, apply the engine's completion, hold the
//! highlight, then rank.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use ideoscope_core::config::EngineConfig;
use ideoscope_core::embedding::QueryEmbedder;
use ideoscope_core::search::RetrievalEngine;
use ideoscope_core::session::{Ack, SearchPhase, SearchSession};

use crate::{config, snapshot};

/// Runs one search end to end and returns the finished session.
///
/// The session comes back in `Ranked` with results, or in `Idle` carrying a
/// user-facing message (no results, or a failure the engine reported).
/// Infrastructure problems reaching the snapshot or building the embedder
/// are hard errors.
pub async fn execute_search(
    query: &str,
    reference: Option<&str>,
    snapshot_file: Option<&PathBuf>,
    skip_hold: bool,
) -> Result<SearchSession> {
    let store = snapshot::load_snapshot(&config::snapshot_path(snapshot_file)?)?;
    let embedder = config::embedder_from_env()?;

    let engine_config = EngineConfig {
        contextual_dim: embedder.dimensions(),
        ..EngineConfig::default()
    };
    let engine = RetrievalEngine::new(store, embedder, engine_config);

    let mut session = SearchSession::new();
    let generation = session.submit(query);

    info!("Searching for: \"{}\"", query);
    let outcome = engine.search(query, reference).await;
    session.apply_outcome(generation, outcome);

    if session.phase() == SearchPhase::Highlighting {
        if !skip_hold {
            tokio::time::sleep(session.highlight_hold()).await;
        }
        let ack = session.highlight_elapsed(generation);
        debug_assert_eq!(ack, Ack::Applied);
    }

    Ok(session)
}
