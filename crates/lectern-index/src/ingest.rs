//! Ingestion pipeline: chunk → embed → batch upsert.
//!
//! One call covers one flushed window of lecture memory (or one pasted
//! document). Every chunk gets a fresh point id and a payload carrying the
//! chunk text, its position, an ISO timestamp, and the caller's metadata.
//! Records are append-only and never deduplicated across calls — a retried
//! window may be indexed twice, which retrieval tolerates.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::chunker::chunk_text;
use crate::config::IndexConfig;
use crate::embedder::Embedder;
use crate::errors::Result;
use crate::qdrant::{PointRecord, VectorStore};

/// Chunks text and writes embedding records into the vector store.
pub struct IngestionPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    config: IndexConfig,
}

impl IngestionPipeline {
    /// Build a pipeline over the given collaborators.
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

    /// Ingest `text`, returning how many records were stored.
    ///
    /// All records for the call are upserted in a single batch. An embedding
    /// or store failure aborts the whole call with nothing partially
    /// committed on our side; the caller decides whether to retry with the
    /// same text.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn ingest(&self, text: &str, metadata: &Map<String, Value>) -> Result<usize> {
        let chunks = chunk_text(text, self.config.max_tokens, self.config.overlap_tokens);
        if chunks.is_empty() {
            debug!("nothing to ingest after chunking");
            return Ok(0);
        }

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut points = Vec::with_capacity(chunks.len());
        for (position, chunk) in chunks.iter().enumerate() {
            let vector = self.embedder.embed(chunk).await?;

            let mut payload = Map::new();
            let _ = payload.insert("text".into(), Value::String(chunk.clone()));
            let _ = payload.insert("position".into(), Value::from(position));
            let _ = payload.insert("timestamp".into(), Value::String(timestamp.clone()));
            for (key, value) in metadata {
                let _ = payload.insert(key.clone(), value.clone());
            }

            points.push(PointRecord {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: Value::Object(payload),
            });
        }

        let stored = points.len();
        self.store.upsert(points).await?;
        debug!(stored, "ingested window");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IndexError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubEmbedder {
        dimensions: usize,
        fail: bool,
        calls: Mutex<usize>,
    }

    impl StubEmbedder {
        fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                fail: false,
                calls: Mutex::new(0),
            }
        }

        fn failing(dimensions: usize) -> Self {
            Self {
                fail: true,
                ..Self::new(dimensions)
            }
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            *self.calls.lock().unwrap() += 1;
            if self.fail {
                return Err(IndexError::Embedding("stub failure".into()));
            }
            Ok(vec![0.5; self.dimensions])
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        fail: bool,
        upserts: Mutex<Vec<Vec<PointRecord>>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn ensure_collection(&self) -> Result<()> {
            Ok(())
        }

        async fn upsert(&self, points: Vec<PointRecord>) -> Result<()> {
            if self.fail {
                return Err(IndexError::Store("stub store down".into()));
            }
            self.upserts.lock().unwrap().push(points);
            Ok(())
        }

        async fn search(
            &self,
            _vector: Vec<f32>,
            _filters: &Map<String, Value>,
            _limit: usize,
        ) -> Result<Vec<crate::qdrant::ScoredPoint>> {
            Ok(Vec::new())
        }
    }

    fn metadata() -> Map<String, Value> {
        let mut m = Map::new();
        let _ = m.insert("course_id".into(), Value::String("c1".into()));
        let _ = m.insert("lecture_id".into(), Value::String("lec_1".into()));
        let _ = m.insert("source".into(), Value::String("live_lecture".into()));
        m
    }

    fn long_text() -> String {
        (0..80)
            .map(|i| format!("Sentence number {i} talks about the lecture topic in detail."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn ingest_stores_one_record_per_chunk() {
        let embedder = Arc::new(StubEmbedder::new(4));
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestionPipeline::new(
            Arc::clone(&embedder) as Arc<dyn Embedder>,
            Arc::clone(&store) as Arc<dyn VectorStore>,
            IndexConfig::default(),
        );

        let stored = pipeline.ingest(&long_text(), &metadata()).await.unwrap();
        assert!(stored > 1);

        let upserts = store.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 1, "all records in one batch");
        assert_eq!(upserts[0].len(), stored);
        assert_eq!(*embedder.calls.lock().unwrap(), stored);
    }

    #[tokio::test]
    async fn payload_carries_text_position_timestamp_and_metadata() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestionPipeline::new(
            Arc::new(StubEmbedder::new(4)),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            IndexConfig::default(),
        );

        let _ = pipeline
            .ingest("A short window of speech.", &metadata())
            .await
            .unwrap();

        let upserts = store.upserts.lock().unwrap();
        let point = &upserts[0][0];
        assert_eq!(point.payload["text"], "A short window of speech.");
        assert_eq!(point.payload["position"], 0);
        assert_eq!(point.payload["course_id"], "c1");
        assert_eq!(point.payload["lecture_id"], "lec_1");
        assert_eq!(point.payload["source"], "live_lecture");
        let ts = point.payload["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[tokio::test]
    async fn point_ids_are_fresh_uuids() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestionPipeline::new(
            Arc::new(StubEmbedder::new(4)),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            IndexConfig::default(),
        );

        let _ = pipeline.ingest(&long_text(), &metadata()).await.unwrap();
        let upserts = store.upserts.lock().unwrap();
        let mut ids: Vec<&str> = upserts[0].iter().map(|p| p.id.as_str()).collect();
        for id in &ids {
            assert!(Uuid::parse_str(id).is_ok());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), upserts[0].len(), "ids must be unique");
    }

    #[tokio::test]
    async fn positions_are_sequential() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestionPipeline::new(
            Arc::new(StubEmbedder::new(4)),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            IndexConfig::default(),
        );

        let _ = pipeline.ingest(&long_text(), &metadata()).await.unwrap();
        let upserts = store.upserts.lock().unwrap();
        for (i, point) in upserts[0].iter().enumerate() {
            assert_eq!(point.payload["position"], i);
        }
    }

    #[tokio::test]
    async fn empty_text_stores_nothing() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestionPipeline::new(
            Arc::new(StubEmbedder::new(4)),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            IndexConfig::default(),
        );

        let stored = pipeline.ingest("   ", &metadata()).await.unwrap();
        assert_eq!(stored, 0);
        assert!(store.upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_aborts_whole_call() {
        let store = Arc::new(RecordingStore::default());
        let pipeline = IngestionPipeline::new(
            Arc::new(StubEmbedder::failing(4)),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            IndexConfig::default(),
        );

        let err = pipeline
            .ingest("A short window of speech.", &metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::Embedding(_)));
        assert!(store.upserts.lock().unwrap().is_empty(), "nothing committed");
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..RecordingStore::default()
        });
        let pipeline = IngestionPipeline::new(
            Arc::new(StubEmbedder::new(4)),
            store,
            IndexConfig::default(),
        );

        let err = pipeline
            .ingest("A short window of speech.", &metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::Store(_)));
    }
}
