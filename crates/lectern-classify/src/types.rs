//! Classification contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Structured verdict on one transcript fragment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Whether the fragment is a teachable moment.
    pub is_highlight: bool,
    /// Kind of moment: `definition`, `formula`, `example`, or `concept`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Short label for the moment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The excerpt worth annotating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Classifier confidence in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Classification {
    /// The "nothing here" verdict.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Decides whether a flushed fragment is a highlight.
#[async_trait]
pub trait HighlightClassifier: Send + Sync {
    /// Classify one fragment of transcript text.
    async fn classify(&self, fragment: &str) -> Result<Classification>;
}
