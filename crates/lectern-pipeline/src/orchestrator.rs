//! Per-fragment orchestration.
//!
//! `on_fragment` requires an active session, feeds both of its buffers under
//! the per-session lock, then runs ingestion and classification as two
//! spawned tasks joined only to assemble the outcome. Each task catches its
//! own failure: ingestion errors become `ragStatus: "failed"`, classifier
//! errors fail open to "no highlight". Neither can suppress the other.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

use lectern_classify::HighlightClassifier;
use lectern_core::{ChunkId, LectureId};
use lectern_events::{HighlightEvent, LectureBroadcaster, LectureEvent, LectureEventKind};
use lectern_index::IngestionPipeline;
use lectern_session::{Result, SessionError, SessionRegistry};

use crate::types::{FragmentOutcome, RagStatus};

/// Joins fast/slow buffer flushes per incoming fragment.
pub struct Orchestrator {
    registry: Arc<SessionRegistry>,
    ingestion: Arc<IngestionPipeline>,
    classifier: Arc<dyn HighlightClassifier>,
    broadcaster: LectureBroadcaster,
}

impl Orchestrator {
    /// Build an orchestrator over the given collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<SessionRegistry>,
        ingestion: Arc<IngestionPipeline>,
        classifier: Arc<dyn HighlightClassifier>,
        broadcaster: LectureBroadcaster,
    ) -> Self {
        Self {
            registry,
            ingestion,
            classifier,
            broadcaster,
        }
    }

    /// Process one transcript fragment for `lecture_id`.
    ///
    /// Fails fast with [`SessionError`] for unknown or stopped sessions,
    /// mutating nothing. Otherwise the fragment lands in both buffers, any
    /// ready window is flushed down its path, and the joined outcome comes
    /// back.
    #[instrument(skip(self, text), fields(lecture_id = %lecture_id))]
    pub async fn on_fragment(
        &self,
        lecture_id: &LectureId,
        text: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<FragmentOutcome> {
        if text.trim().is_empty() {
            return Ok(FragmentOutcome {
                rag_status: RagStatus::Buffering,
                highlight_emitted: false,
            });
        }

        let state = self.registry.state(lecture_id)?;
        let (slow_window, fast_window, metadata) = {
            let mut state = state.lock().await;
            if !state.session.is_active {
                return Err(SessionError::Inactive(lecture_id.clone()));
            }

            state.fast.add_fragment(text);
            state.memory.add_fragment(text);

            let slow_window = state.memory.should_flush().then(|| state.memory.flush());
            let fast_window = state.fast.flush_if_ready();

            let mut metadata = Map::new();
            let _ = metadata.insert(
                "lecture_id".into(),
                Value::String(state.session.lecture_id.to_string()),
            );
            let _ = metadata.insert(
                "course_id".into(),
                Value::String(state.session.course_id.to_string()),
            );
            let _ = metadata.insert(
                "material_ids".into(),
                Value::from(state.session.material_ids.clone()),
            );
            let _ = metadata.insert("source".into(), Value::String("live_lecture".into()));

            (slow_window, fast_window, metadata)
        };

        let ingest_task = slow_window.map(|window| self.spawn_ingest(lecture_id, window, metadata));
        let classify_task =
            fast_window.map(|window| self.spawn_classify(lecture_id, window, start_ms, end_ms));

        let rag_status = match ingest_task {
            Some(handle) => handle.await.unwrap_or(RagStatus::Failed),
            None => RagStatus::Buffering,
        };
        let highlight_emitted = match classify_task {
            Some(handle) => handle.await.unwrap_or(false),
            None => false,
        };

        Ok(FragmentOutcome {
            rag_status,
            highlight_emitted,
        })
    }

    fn spawn_ingest(
        &self,
        lecture_id: &LectureId,
        window: String,
        metadata: Map<String, Value>,
    ) -> JoinHandle<RagStatus> {
        let ingestion = Arc::clone(&self.ingestion);
        let broadcaster = self.broadcaster.clone();
        let lecture_id = lecture_id.clone();
        tokio::spawn(async move {
            let status = match ingestion.ingest(&window, &metadata).await {
                Ok(stored_chunks) => RagStatus::Ingested { stored_chunks },
                Err(e) => {
                    // The dequeued window is dropped; retrying is the
                    // caller's call.
                    warn!(lecture_id = %lecture_id, error = %e, "window ingestion failed");
                    RagStatus::Failed
                }
            };
            let _ = broadcaster.publish(&LectureEvent::new(
                LectureEventKind::Status,
                lecture_id,
                serde_json::json!({
                    "ragStatus": status.as_str(),
                    "storedChunks": status.stored_chunks(),
                }),
            ));
            status
        })
    }

    fn spawn_classify(
        &self,
        lecture_id: &LectureId,
        window: String,
        start_ms: i64,
        end_ms: i64,
    ) -> JoinHandle<bool> {
        let classifier = Arc::clone(&self.classifier);
        let broadcaster = self.broadcaster.clone();
        let lecture_id = lecture_id.clone();
        tokio::spawn(async move {
            let classification = match classifier.classify(&window).await {
                Ok(c) => c,
                Err(e) => {
                    // Fail open: a flaky classifier cannot stall the
                    // ingestion path.
                    warn!(lecture_id = %lecture_id, error = %e, "classification failed");
                    return false;
                }
            };
            if !classification.is_highlight {
                return false;
            }

            let event = HighlightEvent {
                lecture_id: lecture_id.clone(),
                chunk_id: ChunkId::from(format!("{lecture_id}-{end_ms}")),
                highlight: true,
                highlight_type: classification.kind,
                highlighted_text: classification.excerpt.or(Some(window)),
                confidence: classification.confidence,
                timestamp_start: start_ms,
                timestamp_end: end_ms,
            };
            let payload = match serde_json::to_value(&event) {
                Ok(v) => v,
                Err(e) => {
                    warn!(lecture_id = %lecture_id, error = %e, "highlight serialization failed");
                    return false;
                }
            };
            let _ = broadcaster.publish(&LectureEvent::new(
                LectureEventKind::Highlight,
                lecture_id,
                payload,
            ));
            true
        })
    }
}
