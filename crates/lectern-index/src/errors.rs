//! Indexing error types.
//!
//! An embedding or store failure during ingestion aborts the whole call and
//! propagates to the caller; during retrieval it surfaces as an explicit
//! failure so "nothing relevant found" stays distinguishable from
//! "retrieval broken". No automatic retries happen at this layer beyond the
//! embedding client's bounded transport backoff.

use thiserror::Error;

/// Errors from the embedding/vector-store path.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The embedding service call failed.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// A vector-store operation failed.
    #[error("vector store operation failed: {0}")]
    Store(String),

    /// A collaborator returned a payload we could not interpret.
    #[error("unexpected collaborator response: {0}")]
    Response(String),
}

/// Result alias for indexing operations.
pub type Result<T> = std::result::Result<T, IndexError>;
