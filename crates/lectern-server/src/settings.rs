//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`LecternSettings::default()`]
//! 2. If `~/.lectern/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply `LECTERN_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use lectern_index::IndexConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ServerConfig;

/// Errors from settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file held invalid JSON or an invalid shape.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Embedding collaborator settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Feature-extraction endpoint URL.
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction".into(),
            api_key: None,
        }
    }
}

/// Vector store collaborator settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantSettings {
    /// Qdrant base URL.
    pub url: String,
    /// `api-key` header value, if the deployment requires one.
    pub api_key: Option<String>,
}

impl Default for QdrantSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:6333".into(),
            api_key: None,
        }
    }
}

/// Speech-to-text collaborator settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepgramSettings {
    /// API key; audio transcription routes stay disabled without one.
    pub api_key: Option<String>,
}

/// Top-level layered settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LecternSettings {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Chunking/retrieval settings.
    pub index: IndexConfig,
    /// Embedding collaborator.
    pub embedding: EmbeddingSettings,
    /// Vector store collaborator.
    pub qdrant: QdrantSettings,
    /// Speech-to-text collaborator.
    pub deepgram: DeepgramSettings,
}

/// Resolve the path to the settings file (`~/.lectern/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".lectern").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<LecternSettings, SettingsError> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<LecternSettings, SettingsError> {
    let defaults = serde_json::to_value(LecternSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: LecternSettings = serde_json::from_value(merged)?;
    apply_overrides(
        &mut settings,
        std::env::vars().filter(|(key, _)| key.starts_with("LECTERN_")),
    );
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
#[must_use]
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target), Value::Object(source)) => {
            for (key, value) in source {
                if value.is_null() {
                    continue;
                }
                let merged = match target.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                let _ = target.insert(key, merged);
            }
            Value::Object(target)
        }
        (target, Value::Null) => target,
        (_, source) => source,
    }
}

/// Apply `LECTERN_*` overrides from an iterator of key/value pairs.
fn apply_overrides(
    settings: &mut LecternSettings,
    vars: impl IntoIterator<Item = (String, String)>,
) {
    for (key, value) in vars {
        match key.as_str() {
            "LECTERN_HOST" => settings.server.host = value,
            "LECTERN_PORT" => {
                if let Ok(port) = value.parse() {
                    settings.server.port = port;
                }
            }
            "LECTERN_QDRANT_URL" => settings.qdrant.url = value,
            "LECTERN_QDRANT_API_KEY" => settings.qdrant.api_key = Some(value),
            "LECTERN_EMBEDDING_ENDPOINT" => settings.embedding.endpoint = value,
            "LECTERN_EMBEDDING_API_KEY" => settings.embedding.api_key = Some(value),
            "LECTERN_DEEPGRAM_API_KEY" => settings.deepgram.api_key = Some(value),
            _ => {}
        }
    }
}
