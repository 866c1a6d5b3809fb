//! `LecternServer` — Axum router over the engine.

use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::health::{self, HealthResponse};
use crate::routes;
use crate::state::AppState;

/// The Lectern HTTP server.
pub struct LecternServer {
    state: AppState,
}

impl LecternServer {
    /// Create a server over the given state.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the Axum router with all routes.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/lectures/start", post(routes::lectures::start))
            .route("/lectures/stop", post(routes::lectures::stop))
            .route("/lectures/{id}/fragments", post(routes::lectures::fragment))
            .route("/lectures/{id}/audio", post(routes::lectures::audio))
            .route("/lectures/{id}/stream", get(routes::stream::stream_lecture))
            .route("/rag/query", post(routes::rag::query))
            .route("/rag/ingest", post(routes::rag::ingest))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// The shared state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let resp = health::health_check(
        state.start_time,
        state.registry.active_count(),
        state.broadcaster.total_subscribers(),
    );
    Json(resp)
}
