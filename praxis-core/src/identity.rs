//! Identity types for Praxis entities

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Length of the hex-encoded identifier string.
pub const OBJECT_ID_LEN: usize = 24;

/// Entity identifier: a 24-character lowercase hex string.
///
/// Layout mirrors the classic document-store ObjectId: 4-byte seconds
/// timestamp, 5-byte per-process random value, 3-byte counter. The prefix
/// makes freshly generated identifiers sortable by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

/// Error returned when a string is not a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{0}': expected 24 lowercase hex characters")]
pub struct InvalidObjectId(pub String);

/// Check whether `s` is a well-formed identifier: exactly 24 characters
/// drawn from `[0-9a-f]`. Pure, no side effects.
pub fn is_valid_identifier(s: &str) -> bool {
    s.len() == OBJECT_ID_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

// Per-process random component, fixed for the process lifetime.
static PROCESS_RANDOM: Lazy<[u8; 5]> = Lazy::new(|| {
    let mut bytes = [0u8; 5];
    rand::rng().fill_bytes(&mut bytes);
    bytes
});

// Counter component, seeded randomly so restarts don't replay sequences.
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::rng().next_u32()));

impl ObjectId {
    /// Generate a fresh identifier.
    ///
    /// Collision avoidance is probabilistic (random process component plus
    /// a monotonically advancing counter); uniqueness is not re-checked
    /// against the store.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_RANDOM);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

        ObjectId(hex::encode(bytes))
    }

    /// Parse a string, rejecting anything that is not 24 lowercase hex chars.
    pub fn parse(s: &str) -> Result<Self, InvalidObjectId> {
        if is_valid_identifier(s) {
            Ok(ObjectId(s.to_string()))
        } else {
            Err(InvalidObjectId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = InvalidObjectId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ObjectId::parse(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generated_ids_are_valid() {
        for _ in 0..64 {
            let id = ObjectId::generate();
            assert!(is_valid_identifier(id.as_str()));
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = ObjectId::generate();
        let b = ObjectId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_valid_identifier_accepts_exact_form() {
        assert!(is_valid_identifier("0123456789abcdef01234567"));
        assert!(is_valid_identifier("ffffffffffffffffffffffff"));
        assert!(is_valid_identifier("000000000000000000000000"));
    }

    #[test]
    fn test_valid_identifier_rejects_wrong_length() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("abc"));
        assert!(!is_valid_identifier("0123456789abcdef0123456"));
        assert!(!is_valid_identifier("0123456789abcdef012345678"));
    }

    #[test]
    fn test_valid_identifier_rejects_non_hex() {
        assert!(!is_valid_identifier("0123456789abcdef0123456g"));
        assert!(!is_valid_identifier("0123456789ABCDEF01234567"));
        assert!(!is_valid_identifier("0123456789abcdef0123456 "));
    }

    #[test]
    fn test_parse_round_trip() {
        let id = ObjectId::generate();
        let parsed: ObjectId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let err = serde_json::from_str::<ObjectId>("\"not-an-id\"");
        assert!(err.is_err());

        let ok: ObjectId = serde_json::from_str("\"0123456789abcdef01234567\"").unwrap();
        assert_eq!(ok.as_str(), "0123456789abcdef01234567");
    }

    proptest! {
        #[test]
        fn prop_valid_iff_24_lower_hex(s in "[0-9a-f]{24}") {
            prop_assert!(is_valid_identifier(&s));
        }

        #[test]
        fn prop_rejects_other_lengths(s in "[0-9a-f]{0,23}") {
            prop_assert!(!is_valid_identifier(&s));
        }

        #[test]
        fn prop_rejects_non_hex_chars(s in "[g-zG-Z!-/]{24}") {
            prop_assert!(!is_valid_identifier(&s));
        }
    }
}
