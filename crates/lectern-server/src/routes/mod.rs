//! HTTP route handlers.

pub mod lectures;
pub mod rag;
pub mod stream;
