//! Newtype IDs for type-safe identifiers.
//!
//! The booking API is not consistent about identifier encoding: some
//! endpoints send strings, others bare integers. Every ID type accepts both
//! on the wire and always serializes as a string.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ReviewId);
define_id!(UserId);
define_id!(AccommodationCode);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string_and_number() {
        let a: ReviewId = serde_json::from_str(r#""rev-1""#).unwrap();
        let b: ReviewId = serde_json::from_str("42").unwrap();
        assert_eq!(a.as_str(), "rev-1");
        assert_eq!(b.as_str(), "42");
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = AccommodationCode::new("HTL-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""HTL-7""#);
    }

    #[test]
    fn test_id_display() {
        let id = UserId::from("user-9");
        assert_eq!(format!("{}", id), "user-9");
    }
}
