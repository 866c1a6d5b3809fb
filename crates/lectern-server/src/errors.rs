//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use lectern_events::SubscriptionError;
use lectern_index::IndexError;
use lectern_session::SessionError;
use lectern_transcription::TranscriptionError;

/// Errors surfaced on the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The referenced resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The session exists but is no longer accepting work.
    #[error("{0}")]
    Conflict(String),

    /// A collaborator call failed.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => Self::NotFound(err.to_string()),
            SessionError::Inactive(_) => Self::Conflict(err.to_string()),
        }
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<IndexError> for ApiError {
    fn from(err: IndexError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<TranscriptionError> for ApiError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::InvalidAudio(_) => Self::BadRequest(err.to_string()),
            TranscriptionError::Backend(_) | TranscriptionError::Response(_) => {
                Self::Upstream(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::LectureId;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Upstream("x".into()).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn session_errors_map_distinctly() {
        let not_found: ApiError = SessionError::NotFound(LectureId::from("x")).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let inactive: ApiError = SessionError::Inactive(LectureId::from("x")).into();
        assert_eq!(inactive.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn subscription_error_is_not_found() {
        let err: ApiError = SubscriptionError::NotActive(LectureId::from("x")).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn retrieval_failure_is_bad_gateway() {
        let err: ApiError = IndexError::Embedding("down".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_audio_is_bad_request() {
        let err: ApiError = TranscriptionError::InvalidAudio("empty".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = TranscriptionError::Backend("503".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
