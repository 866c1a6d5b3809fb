//! Live lecture event types.
//!
//! [`LectureEventKind`] enumerates everything that can be pushed to an
//! attached client. [`LectureEvent`] wraps a kind with its lecture, payload,
//! and timestamp for transport. The string values are the wire format the
//! front-end stream reader depends on.

use chrono::{SecondsFormat, Utc};
use lectern_core::{ChunkId, LectureId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event kinds published on a lecture's live channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LectureEventKind {
    /// A lecture session was started.
    #[serde(rename = "lecture.started")]
    Started,
    /// A lecture session was stopped.
    #[serde(rename = "lecture.stopped")]
    Stopped,
    /// A teachable moment was detected in the live transcript.
    #[serde(rename = "highlight")]
    Highlight,
    /// Pipeline status for the most recent ingestion window.
    #[serde(rename = "status")]
    Status,
    /// Diagnostic payload for stream debugging.
    #[serde(rename = "debug")]
    Debug,
    /// Keep-alive frame.
    #[serde(rename = "ping")]
    Ping,
}

impl LectureEventKind {
    /// The `event:` field name used when framing this kind for server-sent
    /// events. Lifecycle kinds collapse onto the `status` frame.
    #[must_use]
    pub fn sse_event(self) -> &'static str {
        match self {
            Self::Started | Self::Stopped | Self::Status => "status",
            Self::Highlight => "highlight",
            Self::Debug => "debug",
            Self::Ping => "ping",
        }
    }
}

/// An event bound to one lecture, ready for fan-out.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureEvent {
    /// What happened.
    #[serde(rename = "type")]
    pub kind: LectureEventKind,
    /// The lecture this event belongs to.
    pub lecture_id: LectureId,
    /// Event payload.
    pub data: Value,
    /// ISO-8601 timestamp (milliseconds, UTC).
    pub timestamp: String,
}

impl LectureEvent {
    /// Build an event stamped with the current time.
    #[must_use]
    pub fn new(kind: LectureEventKind, lecture_id: LectureId, data: Value) -> Self {
        Self {
            kind,
            lecture_id,
            data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// A detected teachable moment, published once on the lecture's channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightEvent {
    /// The lecture the fragment came from.
    pub lecture_id: LectureId,
    /// Identifier of the classified fragment.
    pub chunk_id: ChunkId,
    /// Always `true` for published events; non-highlights are never published.
    pub highlight: bool,
    /// Kind of moment: `definition`, `formula`, `example`, or `concept`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_type: Option<String>,
    /// The flagged transcript excerpt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_text: Option<String>,
    /// Classifier confidence in `[0, 1]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Fragment start time (epoch milliseconds).
    pub timestamp_start: i64,
    /// Fragment end time (epoch milliseconds).
    pub timestamp_end: i64,
}
