//! Session error types.

use lectern_core::LectureId;
use thiserror::Error;

/// Errors from session-scoped operations.
///
/// Both variants are fail-fast: no buffer state is mutated for the
/// offending lecture id.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session exists for the given id.
    #[error("unknown lecture session: {0}")]
    NotFound(LectureId),

    /// The session exists but has been stopped.
    #[error("lecture session is no longer active: {0}")]
    Inactive(LectureId),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
