//! Retrieval and direct-ingest routes.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::errors::ApiError;
use crate::state::AppState;

/// `POST /rag/query` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// The question to retrieve context for.
    pub question: String,
    /// Equality filters on payload fields (e.g. `course_id`).
    #[serde(default)]
    pub filters: Map<String, Value>,
    /// How many contexts to return (defaults to the configured top-k).
    pub top_k: Option<usize>,
}

/// `POST /rag/query`
///
/// An empty `contexts` list is a successful "nothing relevant found";
/// a retrieval failure surfaces as a 502 instead.
#[instrument(skip_all)]
pub async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("question required".into()));
    }

    let contexts = state
        .retrieval
        .retrieve(&req.question, &req.filters, req.top_k)
        .await?;
    Ok(Json(json!({ "contexts": contexts })))
}

/// `POST /rag/ingest` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    /// Raw text to index.
    pub text: String,
    /// Payload metadata stored with every chunk.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// `POST /rag/ingest` — index raw text outside the live-lecture path.
#[instrument(skip_all)]
pub async fn ingest(
    State(state): State<AppState>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text required".into()));
    }

    let stored = state.ingestion.ingest(&req.text, &req.metadata).await?;
    Ok(Json(json!({ "storedChunks": stored })))
}
