//! Similarity-ranked retrieval.
//!
//! Embeds the question, searches the store for `top_k * overfetch` nearest
//! neighbors, then quality-filters and re-ranks locally. The over-fetch
//! exists because the store's native ranking is unaware of the quality
//! threshold — without it, filtering could starve the final list.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::config::IndexConfig;
use crate::embedder::Embedder;
use crate::errors::Result;
use crate::qdrant::VectorStore;

/// Answers similarity queries over the indexed collection.
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    config: IndexConfig,
}

impl RetrievalEngine {
    /// Build an engine over the given collaborators.
    #[must_use]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        config: IndexConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// Retrieve the payload texts most relevant to `question`.
    ///
    /// `filters` become equality must-match clauses. Results scoring at or
    /// below the quality threshold are dropped; the survivors come back
    /// sorted by descending score, at most `top_k` of them. An empty result
    /// is a successful answer ("nothing relevant found"), distinct from an
    /// `Err` ("retrieval broken").
    #[instrument(skip_all, fields(top_k))]
    pub async fn retrieve(
        &self,
        question: &str,
        filters: &Map<String, Value>,
        top_k: Option<usize>,
    ) -> Result<Vec<String>> {
        let top_k = top_k.unwrap_or(self.config.top_k).max(1);
        let query_vector = self.embedder.embed(question).await?;

        let fetch_limit = top_k * self.config.overfetch_factor;
        let mut hits = self
            .store
            .search(query_vector, filters, fetch_limit)
            .await?;

        hits.retain(|hit| hit.score > self.config.score_threshold);
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);

        let contexts: Vec<String> = hits
            .into_iter()
            .filter_map(|hit| match hit.payload.get("text").and_then(Value::as_str) {
                Some(text) => Some(text.to_owned()),
                None => {
                    warn!(id = %hit.id, "search hit missing text payload");
                    None
                }
            })
            .collect();
        debug!(returned = contexts.len(), "retrieval complete");
        Ok(contexts)
    }
}
