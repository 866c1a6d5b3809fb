//! Indexing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the chunking, ingestion, and retrieval path.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Vector-store collection name.
    pub collection: String,
    /// Embedding vector dimensionality.
    pub dimensions: usize,
    /// Token budget per chunk.
    pub max_tokens: usize,
    /// Words of trailing overlap seeded into the next chunk.
    pub overlap_tokens: usize,
    /// Results with similarity at or below this score are dropped.
    pub score_threshold: f64,
    /// Over-fetch factor applied to `top_k` when searching, so quality
    /// filtering doesn't starve the final list.
    pub overfetch_factor: usize,
    /// Default number of contexts returned per query.
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            collection: "lectern_docs".into(),
            dimensions: 384,
            max_tokens: 180,
            overlap_tokens: 30,
            score_threshold: 0.35,
            overfetch_factor: 4,
            top_k: 5,
        }
    }
}
