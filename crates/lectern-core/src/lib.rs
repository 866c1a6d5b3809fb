//! # lectern-core
//!
//! Foundation types for the Lectern lecture engine: branded ID newtypes and
//! the text utilities (normalization, token estimation) shared by the
//! buffering and indexing paths.

#![deny(unsafe_code)]

pub mod ids;
pub mod text;

pub use ids::{ChunkId, CourseId, LectureId, SubscriberId, UserId};
pub use text::{approximate_tokens, normalize_text};
