//! # lectern-transcription
//!
//! Speech-to-text collaborator client: short audio chunks in, transcript
//! text out. Transcription itself happens in a hosted service; this crate
//! only carries the audio over and pulls the transcript out of the
//! response.

#![deny(unsafe_code)]

pub mod deepgram;
pub mod errors;

pub use deepgram::DeepgramClient;
pub use errors::{Result, TranscriptionError};

use async_trait::async_trait;
use bytes::Bytes;

/// Transcribes an audio chunk into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe `audio` with the given MIME type (e.g. `audio/webm`).
    ///
    /// An empty transcript is a valid result for silent audio.
    async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String>;
}
