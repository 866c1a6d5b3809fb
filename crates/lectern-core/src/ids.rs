//! Branded ID newtypes for type safety.
//!
//! Every entity in the Lectern system has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing a
//! course ID where a lecture ID is expected.
//!
//! Freshly minted IDs are UUID v7 (time-ordered) via [`uuid::Uuid::now_v7`];
//! callers that carry externally-issued identifiers construct IDs from
//! strings instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a new UUID v7 string (time-ordered).
fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a live lecture session.
    LectureId
}

branded_id! {
    /// Identifier of the course a lecture belongs to.
    CourseId
}

branded_id! {
    /// Identifier of the user who started a lecture.
    UserId
}

branded_id! {
    /// Identifier of a classified transcript fragment.
    ChunkId
}

branded_id! {
    /// Identifier of a live-stream subscriber.
    SubscriberId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lecture_id_new_is_uuid_v7() {
        let id = LectureId::new();
        let parsed = Uuid::parse_str(id.as_str()).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn ids_are_unique() {
        let a = LectureId::new();
        let b = LectureId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn from_str_ref() {
        let id = CourseId::from("course_42");
        assert_eq!(id.as_str(), "course_42");
    }

    #[test]
    fn display() {
        let id = LectureId::from("display-me");
        assert_eq!(format!("{id}"), "display-me");
    }

    #[test]
    fn into_string() {
        let id = UserId::from("convert");
        let s: String = id.into();
        assert_eq!(s, "convert");
    }

    #[test]
    fn into_inner() {
        let id = ChunkId::from("inner-test");
        assert_eq!(id.into_inner(), "inner-test");
    }

    #[test]
    fn serde_roundtrip_is_transparent() {
        let id = LectureId::from("serde-test");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"serde-test\"");
        let back: LectureId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_in_struct() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Keyed {
            lecture_id: LectureId,
            course_id: CourseId,
        }

        let keyed = Keyed {
            lecture_id: LectureId::from("lec-1"),
            course_id: CourseId::from("crs-1"),
        };
        let json = serde_json::to_string(&keyed).unwrap();
        let back: Keyed = serde_json::from_str(&json).unwrap();
        assert_eq!(keyed, back);
    }

    #[test]
    fn hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = LectureId::from("same");
        let _ = set.insert(id.clone());
        let _ = set.insert(id);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn default_creates_new() {
        let a = SubscriberId::default();
        let b = SubscriberId::default();
        assert_ne!(a, b, "default should create unique IDs");
    }
}
