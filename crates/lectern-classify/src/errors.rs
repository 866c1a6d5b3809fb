//! Classification error types.

use thiserror::Error;

/// Errors from a classifier collaborator.
///
/// Callers treat any of these as "no highlight" — classification is
/// best-effort and must never stall fragment processing.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The classifier backend call failed.
    #[error("classifier call failed: {0}")]
    Backend(String),

    /// The classifier returned a payload we could not interpret.
    #[error("unexpected classifier response: {0}")]
    Response(String),
}

/// Result alias for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
