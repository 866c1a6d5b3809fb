//! Lecture session model.

use chrono::Utc;
use lectern_core::{CourseId, LectureId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A live (or finished) lecture session.
///
/// Created on start, mutated only to flip `is_active` and stamp `ended_at`
/// on stop, and never deleted for the lifetime of the process.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureSession {
    /// Unique lecture id.
    pub lecture_id: LectureId,
    /// The user who started the lecture.
    pub user_id: UserId,
    /// The course this lecture belongs to.
    pub course_id: CourseId,
    /// Course materials associated with the lecture.
    pub material_ids: Vec<String>,
    /// Caller-supplied metadata, carried into ingestion payloads.
    pub metadata: Value,
    /// When the session started (epoch milliseconds).
    pub started_at: i64,
    /// When the session stopped (epoch milliseconds), if it has.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<i64>,
    /// Whether the session is still accepting fragments.
    pub is_active: bool,
}

impl LectureSession {
    /// Create a fresh, active session with a newly allocated id.
    #[must_use]
    pub fn start(params: StartSessionParams) -> Self {
        Self {
            lecture_id: LectureId::new(),
            user_id: params.user_id,
            course_id: params.course_id,
            material_ids: params.material_ids,
            metadata: params.metadata,
            started_at: Utc::now().timestamp_millis(),
            ended_at: None,
            is_active: true,
        }
    }

    /// Mark the session stopped and stamp the end time.
    pub fn stop(&mut self) {
        self.is_active = false;
        self.ended_at = Some(Utc::now().timestamp_millis());
    }
}

/// Parameters for starting a new lecture session.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionParams {
    /// The user starting the lecture.
    pub user_id: UserId,
    /// The course the lecture belongs to.
    pub course_id: CourseId,
    /// Associated course materials.
    #[serde(default)]
    pub material_ids: Vec<String>,
    /// Free-form metadata carried into ingestion payloads.
    #[serde(default = "default_metadata")]
    pub metadata: Value,
}

fn default_metadata() -> Value {
    Value::Object(serde_json::Map::new())
}
