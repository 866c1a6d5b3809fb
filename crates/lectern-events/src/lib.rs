//! # lectern-events
//!
//! Live event envelopes and per-lecture fan-out.
//!
//! Each lecture gets its own channel set in the [`LectureBroadcaster`]
//! registry; a subscriber only ever sees events for the lecture it attached
//! to. Delivery is at-most-once and best-effort — there is no replay of
//! events published before a subscription existed.

#![deny(unsafe_code)]

pub mod broadcaster;
pub mod errors;
pub mod types;

pub use broadcaster::{LectureBroadcaster, Subscription};
pub use errors::{Result, SubscriptionError};
pub use types::{HighlightEvent, LectureEvent, LectureEventKind};
