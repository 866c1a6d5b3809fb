//! # lectern-session
//!
//! Lecture session lifecycle and the two per-session transcript buffers.
//!
//! Every live lecture owns a [`FastBuffer`] (micro-accumulator feeding
//! highlight classification) and a [`LectureMemory`] (macro-accumulator
//! feeding semantic indexing). The [`SessionRegistry`] keys both by lecture
//! id so concurrent lectures never share buffer state.

#![deny(unsafe_code)]

pub mod errors;
pub mod fast_buffer;
pub mod memory_buffer;
pub mod registry;
pub mod session;

pub use errors::{Result, SessionError};
pub use fast_buffer::FastBuffer;
pub use memory_buffer::LectureMemory;
pub use registry::{SessionRegistry, SessionState};
pub use session::{LectureSession, StartSessionParams};
