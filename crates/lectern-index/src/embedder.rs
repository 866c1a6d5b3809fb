//! Embedding service client.
//!
//! The engine never computes embeddings itself — it talks to a
//! feature-extraction endpoint that maps text to a fixed-dimension float
//! vector (384 in the reference deployment). Transient transport failures
//! (429, 5xx) get a bounded exponential backoff; everything else propagates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{IndexError, Result};

/// Attempts per embed call, including the first.
const MAX_ATTEMPTS: usize = 3;

/// Maps text to a fixed-dimension embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text span.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of the vectors this embedder produces.
    fn dimensions(&self) -> usize;
}

/// HTTP client for a hosted feature-extraction endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    dimensions: usize,
}

impl HttpEmbedder {
    /// Build a client for `endpoint`, expecting `dimensions`-length vectors.
    #[must_use]
    pub fn new(endpoint: String, api_key: Option<String>, dimensions: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            api_key,
            dimensions,
        }
    }

    async fn request(&self, text: &str) -> Result<reqwest::Response> {
        let mut req = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": [text] }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req.send()
            .await
            .map_err(|e| IndexError::Embedding(e.to_string()))
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_backoff(attempt: usize) -> Duration {
    let capped = u32::try_from(attempt.min(5)).unwrap_or(5);
    Duration::from_millis(250 * (1 << capped))
}

/// Response shapes seen from feature-extraction endpoints: either a batch of
/// vectors or a bare vector for single-input calls.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtractionResponse {
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

impl ExtractionResponse {
    fn into_vector(self) -> Option<Vec<f32>> {
        match self {
            Self::Batch(mut batch) => {
                if batch.is_empty() {
                    None
                } else {
                    Some(batch.swap_remove(0))
                }
            }
            Self::Single(v) => Some(v),
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = self.request(text).await?;
            let status = response.status();

            if status.is_success() {
                let parsed: ExtractionResponse = response
                    .json()
                    .await
                    .map_err(|e| IndexError::Response(e.to_string()))?;
                let vector = parsed
                    .into_vector()
                    .ok_or_else(|| IndexError::Response("empty embedding payload".into()))?;
                if vector.len() != self.dimensions {
                    return Err(IndexError::Response(format!(
                        "expected {} dimensions, got {}",
                        self.dimensions,
                        vector.len()
                    )));
                }
                debug!(chars = text.len(), "embedded text span");
                return Ok(vector);
            }

            let body = response.text().await.unwrap_or_default();
            if should_retry(status) && attempt < MAX_ATTEMPTS {
                warn!(%status, attempt, "embedding call failed, retrying");
                tokio::time::sleep(retry_backoff(attempt)).await;
                continue;
            }
            return Err(IndexError::Embedding(format!("{status}: {body}")));
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
