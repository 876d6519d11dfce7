//! Upsert key resolution
//!
//! A write addressed at a session or report carries either an explicit
//! `_id` or the complete natural compound key. Resolution happens before
//! any store access: a write with neither key form is rejected outright.

use praxis_core::{is_valid_identifier, ObjectId};
use serde_json::Value;
use thiserror::Error;

use crate::query::Filter;

/// Resolved addressing key for an upsert.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertKey {
    /// Address by canonical identifier.
    Id(ObjectId),
    /// Address by a complete natural compound key.
    NaturalKey(Filter),
}

impl UpsertKey {
    /// The store filter locating the addressed document.
    pub fn filter(&self) -> Filter {
        match self {
            UpsertKey::Id(id) => Filter::new().eq("_id", Value::String(id.to_string())),
            UpsertKey::NaturalKey(filter) => filter.clone(),
        }
    }
}

/// The write carried neither a well-formed `_id` nor a complete natural
/// key; it is rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("upsert requires a well-formed _id or a complete natural key")]
pub struct MissingKeyError;

/// Resolve the addressing key for an upsert.
///
/// Precedence: a format-valid explicit `_id` wins; otherwise a complete
/// natural key (the caller passes `Some` only when every component is
/// present); otherwise the write fails. A malformed explicit `_id` is
/// treated as absent and falls through to the natural key.
pub fn resolve_key(
    explicit_id: Option<&str>,
    natural_key: Option<Filter>,
) -> Result<UpsertKey, MissingKeyError> {
    if let Some(raw) = explicit_id {
        if is_valid_identifier(raw) {
            let id = ObjectId::parse(raw).map_err(|_| MissingKeyError)?;
            return Ok(UpsertKey::Id(id));
        }
    }
    match natural_key {
        Some(filter) => Ok(UpsertKey::NaturalKey(filter)),
        None => Err(MissingKeyError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn natural() -> Filter {
        Filter::new()
            .eq("activity_id", "a")
            .eq("user_id", "u")
            .eq("session_id", "s")
    }

    #[test]
    fn test_valid_id_wins_over_natural_key() {
        let key = resolve_key(Some("0123456789abcdef01234567"), Some(natural())).unwrap();
        assert!(matches!(key, UpsertKey::Id(_)));
    }

    #[test]
    fn test_malformed_id_falls_through_to_natural_key() {
        let key = resolve_key(Some("not-an-id"), Some(natural())).unwrap();
        assert!(matches!(key, UpsertKey::NaturalKey(_)));
    }

    #[test]
    fn test_neither_key_form_is_rejected() {
        assert_eq!(resolve_key(None, None), Err(MissingKeyError));
        assert_eq!(resolve_key(Some("bad"), None), Err(MissingKeyError));
    }

    #[test]
    fn test_id_key_filter_pins_underscore_id() {
        let key = resolve_key(Some("0123456789abcdef01234567"), None).unwrap();
        let filter = key.filter();
        assert_eq!(
            filter.eq_value("_id"),
            Some(&serde_json::json!("0123456789abcdef01234567"))
        );
    }
}
