//! Query embedding service.
//!
//! Search queries are embedded into the contextual space by an external
//! service. [`QueryEmbedder`] is the seam; [`OpenAiEmbedder`] is the
//! production implementation, speaking the OpenAI-compatible `/embeddings`
//! protocol (the same endpoint the ingestion job used to populate the
//! contextual index, so dimensionality matches by construction).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config;
use crate::error::EmbedError;

/// Default model for the contextual space (1536 dimensions).
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";

/// Default API endpoint.
pub const DEFAULT_EMBED_ENDPOINT: &str = "https://api.openai.com/v1";

/// Converts query text into a contextual-space vector.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Embeds one query string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Dimensionality of produced vectors; fixed per deployment.
    fn dimensions(&self) -> usize;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible embedding client.
///
/// The HTTP client carries a request timeout
/// ([`config::EMBED_TIMEOUT`]), so no call can wait unbounded; a timeout
/// surfaces as [`EmbedError::Timeout`].
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dims: usize,
}

impl OpenAiEmbedder {
    /// Creates a client for the given API key.
    ///
    /// `endpoint`, `model`, and `dims` default to the production values
    /// when `None`.
    pub fn new(
        api_key: String,
        model: Option<String>,
        endpoint: Option<String>,
        dims: Option<usize>,
    ) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(config::EMBED_TIMEOUT)
            .build()
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_EMBED_ENDPOINT.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            dims: dims.unwrap_or(config::CONTEXTUAL_DIM),
        })
    }
}

#[async_trait]
impl QueryEmbedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/embeddings", self.endpoint);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
        };

        debug!(model = %self.model, "Embedding query");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbedError::Timeout
                } else {
                    EmbedError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Unavailable(format!(
                "API error {status}: {body}"
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Unavailable(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbedError::Unavailable("empty embedding response".to_string()))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}
