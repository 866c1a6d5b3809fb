//! Lectern server binary: wires the collaborators from settings and serves
//! the HTTP surface until interrupted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lectern_classify::LexicalClassifier;
use lectern_events::LectureBroadcaster;
use lectern_index::{
    Embedder, HttpEmbedder, IngestionPipeline, QdrantStore, RetrievalEngine, VectorStore,
};
use lectern_pipeline::Orchestrator;
use lectern_server::{load_settings, AppState, LecternServer, ShutdownCoordinator};
use lectern_session::SessionRegistry;
use lectern_transcription::{DeepgramClient, SpeechToText};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings().context("failed to load settings")?;

    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        settings.embedding.endpoint.clone(),
        settings.embedding.api_key.clone(),
        settings.index.dimensions,
    ));
    let store: Arc<dyn VectorStore> = Arc::new(QdrantStore::new(
        settings.qdrant.url.clone(),
        settings.qdrant.api_key.clone(),
        settings.index.collection.clone(),
        settings.index.dimensions,
    ));
    if let Err(e) = store.ensure_collection().await {
        warn!(error = %e, "vector store not ready; ingestion will fail until it is");
    }

    let broadcaster = LectureBroadcaster::new();
    let registry = Arc::new(SessionRegistry::new(broadcaster.clone()));
    let ingestion = Arc::new(IngestionPipeline::new(
        Arc::clone(&embedder),
        Arc::clone(&store),
        settings.index.clone(),
    ));
    let retrieval = Arc::new(RetrievalEngine::new(
        Arc::clone(&embedder),
        Arc::clone(&store),
        settings.index.clone(),
    ));
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&registry),
        Arc::clone(&ingestion),
        Arc::new(LexicalClassifier::new()),
        broadcaster.clone(),
    ));
    let stt: Option<Arc<dyn SpeechToText>> = settings
        .deepgram
        .api_key
        .clone()
        .map(|key| Arc::new(DeepgramClient::new(key)) as Arc<dyn SpeechToText>);
    if stt.is_none() {
        info!("no speech-to-text key configured; audio routes disabled");
    }

    let state = AppState {
        registry,
        broadcaster,
        orchestrator,
        retrieval,
        ingestion,
        stt,
        start_time: Instant::now(),
        ping_interval: Duration::from_secs(settings.server.ping_interval_secs),
    };
    let server = LecternServer::new(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "lectern server listening");

    let shutdown = ShutdownCoordinator::new();
    let token = shutdown.token();
    axum::serve(listener, server.router())
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                }
                () = token.cancelled() => {}
            }
        })
        .await
        .context("server error")?;

    shutdown.shutdown();
    Ok(())
}
