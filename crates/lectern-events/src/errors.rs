//! Subscription error types.

use lectern_core::LectureId;
use thiserror::Error;

/// Errors raised when attaching to a lecture's live stream.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// The lecture is unknown or no longer active. Subscribing would open a
    /// stream that never receives events, so it fails immediately instead.
    #[error("lecture session not active: {0}")]
    NotActive(LectureId),
}

/// Result alias for subscription operations.
pub type Result<T> = std::result::Result<T, SubscriptionError>;
