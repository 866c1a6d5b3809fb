//! Shared application state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lectern_events::LectureBroadcaster;
use lectern_index::{IngestionPipeline, RetrievalEngine};
use lectern_pipeline::Orchestrator;
use lectern_session::SessionRegistry;
use lectern_transcription::SpeechToText;

/// State accessible from every handler.
#[derive(Clone)]
pub struct AppState {
    /// Session registry owning the per-lecture buffers.
    pub registry: Arc<SessionRegistry>,
    /// Live event fan-out.
    pub broadcaster: LectureBroadcaster,
    /// Per-fragment orchestration.
    pub orchestrator: Arc<Orchestrator>,
    /// Similarity retrieval over the indexed collection.
    pub retrieval: Arc<RetrievalEngine>,
    /// Direct text ingestion (bypassing the live buffers).
    pub ingestion: Arc<IngestionPipeline>,
    /// Speech-to-text collaborator; audio routes 502 without one.
    pub stt: Option<Arc<dyn SpeechToText>>,
    /// When the server started.
    pub start_time: Instant,
    /// Cadence of keep-alive ping frames on live streams.
    pub ping_interval: Duration,
}
