//! # lectern-index
//!
//! The semantic indexing path: chunk transcript windows into
//! embedding-sized spans, embed them, upsert into the vector store, and
//! answer similarity queries over the result.
//!
//! The embedding service and vector store are external collaborators behind
//! the [`Embedder`] and [`VectorStore`] traits; HTTP implementations for a
//! feature-extraction endpoint and Qdrant live alongside them.

#![deny(unsafe_code)]

pub mod chunker;
pub mod config;
pub mod embedder;
pub mod errors;
pub mod ingest;
pub mod qdrant;
pub mod retrieval;

pub use chunker::chunk_text;
pub use config::IndexConfig;
pub use embedder::{Embedder, HttpEmbedder};
pub use errors::{IndexError, Result};
pub use ingest::IngestionPipeline;
pub use qdrant::{PointRecord, QdrantStore, ScoredPoint, VectorStore};
pub use retrieval::RetrievalEngine;
