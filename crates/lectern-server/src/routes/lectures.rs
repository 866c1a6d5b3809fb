//! Lecture lifecycle and fragment routes.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use lectern_core::LectureId;
use lectern_pipeline::FragmentOutcome;
use lectern_session::StartSessionParams;

use crate::errors::ApiError;
use crate::state::AppState;

/// `POST /lectures/start`
#[instrument(skip_all)]
pub async fn start(
    State(state): State<AppState>,
    Json(params): Json<StartSessionParams>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if params.user_id.as_str().is_empty() || params.course_id.as_str().is_empty() {
        return Err(ApiError::BadRequest("userId and courseId required".into()));
    }

    let session = state.registry.start_session(params);
    info!(lecture_id = %session.lecture_id, "lecture started");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "lectureId": session.lecture_id })),
    ))
}

/// `POST /lectures/stop` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRequest {
    /// The lecture to stop.
    pub lecture_id: LectureId,
}

/// `POST /lectures/stop`
#[instrument(skip_all, fields(lecture_id = %req.lecture_id))]
pub async fn stop(
    State(state): State<AppState>,
    Json(req): Json<StopRequest>,
) -> Result<Json<Value>, ApiError> {
    match state.registry.stop_session(&req.lecture_id).await {
        Some(_) => Ok(Json(json!({ "ok": true }))),
        None => Err(ApiError::NotFound(format!(
            "unknown lecture session: {}",
            req.lecture_id
        ))),
    }
}

/// `POST /lectures/{id}/fragments` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRequest {
    /// Newly transcribed speech text.
    pub text: String,
    /// Fragment start time (epoch ms); defaults to now.
    pub start_ms: Option<i64>,
    /// Fragment end time (epoch ms); defaults to now.
    pub end_ms: Option<i64>,
}

fn outcome_body(outcome: &FragmentOutcome) -> Value {
    json!({
        "ragStatus": outcome.rag_status.as_str(),
        "storedChunks": outcome.rag_status.stored_chunks(),
        "highlightEmitted": outcome.highlight_emitted,
    })
}

/// `POST /lectures/{id}/fragments`
#[instrument(skip_all, fields(lecture_id = %id))]
pub async fn fragment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FragmentRequest>,
) -> Result<Json<Value>, ApiError> {
    let lecture_id = LectureId::from(id);
    let now = Utc::now().timestamp_millis();
    let outcome = state
        .orchestrator
        .on_fragment(
            &lecture_id,
            &req.text,
            req.start_ms.unwrap_or(now),
            req.end_ms.unwrap_or(now),
        )
        .await?;
    Ok(Json(outcome_body(&outcome)))
}

/// `POST /lectures/{id}/audio`
///
/// Multipart upload with an `audio` part. The chunk is transcribed first;
/// an empty transcript short-circuits with `{"status": "empty"}`, otherwise
/// the text runs through the fragment pipeline.
#[instrument(skip_all, fields(lecture_id = %id))]
pub async fn audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let Some(stt) = state.stt.clone() else {
        return Err(ApiError::Upstream("speech-to-text is not configured".into()));
    };

    let mut audio = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read audio: {e}")))?;
            audio = Some((bytes, mime_type));
            break;
        }
    }
    let Some((bytes, mime_type)) = audio else {
        return Err(ApiError::BadRequest("no audio uploaded".into()));
    };

    let transcript = stt.transcribe(bytes, &mime_type).await?;
    if transcript.trim().is_empty() {
        return Ok(Json(json!({ "status": "empty" })));
    }

    let lecture_id = LectureId::from(id);
    let now = Utc::now().timestamp_millis();
    let outcome = state
        .orchestrator
        .on_fragment(&lecture_id, &transcript, now, now)
        .await?;

    let mut body = outcome_body(&outcome);
    body["transcript"] = Value::String(transcript);
    Ok(Json(body))
}
