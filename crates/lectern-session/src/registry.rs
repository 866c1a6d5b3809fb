//! Session registry.
//!
//! Owns every live session and its pair of buffers, keyed by lecture id in a
//! concurrency-safe map. Buffer lookup by id can never return another
//! session's buffers, and fragment processing for one lecture serializes on
//! the per-session lock while distinct lectures proceed fully in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use lectern_core::LectureId;
use lectern_events::{LectureBroadcaster, LectureEvent, LectureEventKind};

use crate::errors::{Result, SessionError};
use crate::fast_buffer::FastBuffer;
use crate::memory_buffer::LectureMemory;
use crate::session::{LectureSession, StartSessionParams};

/// A session together with the buffers scoped to it.
#[derive(Debug)]
pub struct SessionState {
    /// The session record.
    pub session: LectureSession,
    /// Micro-buffer feeding highlight classification.
    pub fast: FastBuffer,
    /// Macro-buffer feeding semantic indexing.
    pub memory: LectureMemory,
}

/// Tracks lecture sessions and owns their per-session buffers.
pub struct SessionRegistry {
    sessions: DashMap<LectureId, Arc<Mutex<SessionState>>>,
    broadcaster: LectureBroadcaster,
}

impl SessionRegistry {
    /// Create an empty registry publishing lifecycle events on `broadcaster`.
    #[must_use]
    pub fn new(broadcaster: LectureBroadcaster) -> Self {
        Self {
            sessions: DashMap::new(),
            broadcaster,
        }
    }

    /// Start a new session, allocating fresh empty buffers scoped to its id.
    ///
    /// Publishes a `lecture.started` lifecycle event and returns a snapshot
    /// of the new session.
    pub fn start_session(&self, params: StartSessionParams) -> LectureSession {
        let session = LectureSession::start(params);
        let snapshot = session.clone();
        let state = SessionState {
            session,
            fast: FastBuffer::new(),
            memory: LectureMemory::new(),
        };
        let _ = self
            .sessions
            .insert(snapshot.lecture_id.clone(), Arc::new(Mutex::new(state)));

        info!(lecture_id = %snapshot.lecture_id, course_id = %snapshot.course_id, "lecture session started");
        let _ = self.broadcaster.publish(&LectureEvent::new(
            LectureEventKind::Started,
            snapshot.lecture_id.clone(),
            serde_json::json!({
                "lectureId": snapshot.lecture_id,
                "courseId": snapshot.course_id,
                "materialIds": snapshot.material_ids,
                "startedAt": snapshot.started_at,
            }),
        ));
        snapshot
    }

    /// Stop a session: mark it inactive, stamp the end time, and release its
    /// buffered state. Returns the updated snapshot, or `None` for an
    /// unknown id.
    pub async fn stop_session(&self, lecture_id: &LectureId) -> Option<LectureSession> {
        let state = Arc::clone(self.sessions.get(lecture_id)?.value());
        let mut state = state.lock().await;
        state.session.stop();
        state.fast.reset();
        let _ = state.memory.flush();
        let snapshot = state.session.clone();
        drop(state);

        info!(lecture_id = %lecture_id, "lecture session stopped");
        let _ = self.broadcaster.publish(&LectureEvent::new(
            LectureEventKind::Stopped,
            lecture_id.clone(),
            serde_json::json!({
                "lectureId": lecture_id,
                "endedAt": snapshot.ended_at,
            }),
        ));
        Some(snapshot)
    }

    /// Snapshot of a session by id.
    pub async fn get_session(&self, lecture_id: &LectureId) -> Option<LectureSession> {
        let state = Arc::clone(self.sessions.get(lecture_id)?.value());
        let state = state.lock().await;
        Some(state.session.clone())
    }

    /// The shared state handle for a session, for callers that need to feed
    /// its buffers under the per-session lock.
    ///
    /// Fails fast with [`SessionError`] for unknown ids; the active check
    /// happens under the caller's lock so a concurrent stop cannot race it.
    pub fn state(&self, lecture_id: &LectureId) -> Result<Arc<Mutex<SessionState>>> {
        self.sessions
            .get(lecture_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SessionError::NotFound(lecture_id.clone()))
    }

    /// Number of sessions currently active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        // DashMap iteration is sharded; the count is a best-effort snapshot.
        self.sessions
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .try_lock()
                    .map(|state| state.session.is_active)
                    .unwrap_or(true)
            })
            .count()
    }
}
