//! # lectern-pipeline
//!
//! Joins the fast and slow buffer paths for each incoming transcript
//! fragment: one fragment feeds both buffers, a ready slow buffer flushes
//! into semantic indexing, and a ready fast buffer flushes into highlight
//! classification. The two downstream paths run as independent tasks — a
//! slow embedding call never delays a highlight decision, and a failure in
//! either path is folded into the outcome instead of cancelling its sibling.

#![deny(unsafe_code)]

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::{FragmentOutcome, RagStatus};
