//! Deepgram pre-recorded transcription client.
//!
//! Short audio chunks (a few seconds of speech) are posted to the `listen`
//! endpoint with punctuation and smart formatting enabled; the transcript
//! comes back at `results.channels[0].alternatives[0].transcript`.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, TranscriptionError};
use crate::SpeechToText;

/// Maximum audio chunk size in bytes (50 MB).
const MAX_AUDIO_SIZE: usize = 50 * 1024 * 1024;

/// Query string applied to every transcription request.
const LISTEN_QUERY: [(&str, &str); 4] = [
    ("model", "nova-2"),
    ("smart_format", "true"),
    ("punctuate", "true"),
    ("language", "en"),
];

/// HTTP client for Deepgram's pre-recorded transcription API.
pub struct DeepgramClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DeepgramClient {
    /// Build a client against the hosted API.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_base_url("https://api.deepgram.com".into(), api_key)
    }

    /// Build a client against a specific base URL (tests, proxies).
    #[must_use]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    fn extract_transcript(body: &Value) -> Option<&str> {
        body.get("results")?
            .get("channels")?
            .get(0)?
            .get("alternatives")?
            .get(0)?
            .get("transcript")?
            .as_str()
    }
}

#[async_trait]
impl SpeechToText for DeepgramClient {
    async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String> {
        if audio.is_empty() {
            return Err(TranscriptionError::InvalidAudio("empty audio chunk".into()));
        }
        if audio.len() > MAX_AUDIO_SIZE {
            return Err(TranscriptionError::InvalidAudio(format!(
                "audio chunk too large: {} bytes (max {MAX_AUDIO_SIZE})",
                audio.len()
            )));
        }

        let bytes = audio.len();
        let response = self
            .client
            .post(format!("{}/v1/listen", self.base_url))
            .query(&LISTEN_QUERY)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", mime_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| TranscriptionError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Backend(format!("{status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Response(e.to_string()))?;
        let transcript = Self::extract_transcript(&body).unwrap_or_default().to_owned();
        debug!(bytes, chars = transcript.len(), "transcribed audio chunk");
        Ok(transcript)
    }
}
