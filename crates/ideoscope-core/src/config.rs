//! Production configuration constants.
//!
//! These values define the deployed shape of the corpus and the search
//! pipeline. They are referenced throughout the crate and in tests to keep
//! everything consistent.

use std::time::Duration;

/// Contextual embedding dimension.
///
/// The contextual space is populated by `text-embedding-3-small`, which
/// produces 1536-dimensional vectors. Articles carry a contextual vector;
/// profiles do not.
pub const CONTEXTUAL_DIM: usize = 1536;

/// Ideological embedding dimension.
///
/// The ideological space is a separate, much smaller space produced by the
/// offline ingestion job. Both articles and profiles carry an ideological
/// vector.
pub const IDEOLOGICAL_DIM: usize = 128;

/// Number of first-stage KNN candidates fetched per query.
///
/// Re-ranking happens over this fixed candidate set, so it bounds both the
/// rerank fetch size and the highlight set size.
pub const KNN_CANDIDATES: usize = 20;

/// Multiplier applied to raw artifact coordinates before rendering.
///
/// The ingestion job emits positions in roughly unit scale; the 3D view
/// expects them spread out by this factor.
pub const POSITION_SCALE: f32 = 6.0;

/// How long the spatial view holds the highlight state before the session
/// advances to the ranked list.
pub const HIGHLIGHT_HOLD_MS: u64 = 1500;

/// Upper bound on a single embedding service call.
pub const EMBED_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on a single vector store call (KNN or batch fetch).
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fallback label length for articles with no stored title.
pub const ARTICLE_LABEL_CHARS: usize = 12;

/// Fallback label length for profiles with a blank alias.
pub const PROFILE_LABEL_CHARS: usize = 10;

/// Per-instance engine configuration.
///
/// [`Default`] wires in the production constants above; tests override the
/// dimensions to keep fixtures small.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// First-stage candidate count.
    pub candidates: usize,
    /// Expected contextual vector length.
    pub contextual_dim: usize,
    /// Expected ideological vector length.
    pub ideological_dim: usize,
    /// Timeout for the embedding call.
    pub embed_timeout: Duration,
    /// Timeout for each vector store call.
    pub store_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            candidates: KNN_CANDIDATES,
            contextual_dim: CONTEXTUAL_DIM,
            ideological_dim: IDEOLOGICAL_DIM,
            embed_timeout: EMBED_TIMEOUT,
            store_timeout: STORE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_production_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.candidates, KNN_CANDIDATES);
        assert_eq!(config.contextual_dim, 1536);
        assert_eq!(config.ideological_dim, 128);
    }

    #[test]
    fn test_timeouts_are_bounded() {
        // Every suspension point must have a finite timeout.
        assert!(EMBED_TIMEOUT > Duration::ZERO);
        assert!(STORE_TIMEOUT > Duration::ZERO);
    }
}
