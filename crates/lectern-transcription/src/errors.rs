//! Transcription error types.

use thiserror::Error;

/// Errors from the speech-to-text collaborator.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The audio payload was rejected before any call was made.
    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    /// The transcription service call failed.
    #[error("transcription call failed: {0}")]
    Backend(String),

    /// The service returned a payload we could not interpret.
    #[error("unexpected transcription response: {0}")]
    Response(String),
}

/// Result alias for transcription operations.
pub type Result<T> = std::result::Result<T, TranscriptionError>;
