//! Core entity structures
//!
//! Stored records for the five collections plus the input records that
//! arrive at the API boundary. Stored records always carry well-formed
//! identifiers; input records stay loose (`Option`/`String`) so the
//! validation engine can report per-field errors instead of failing at
//! deserialization.

use crate::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// COURSE PACKAGES AND UNITS
// ============================================================================

/// Course package - an ordered collection of learning units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CoursePackage {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

/// Unit - a single step within a course package.
///
/// Units live in their own collection and point back at their package via
/// `course_package_id`. Ordering is by the explicit `order` field, ties
/// broken by insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Unit {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: ObjectId,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub course_package_id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub order: i32,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

// ============================================================================
// AGENT PROFILES
// ============================================================================

/// Conversation style for an agent persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PersonaStyle {
    Friendly,
    Formal,
    Socratic,
    Concise,
}

impl PersonaStyle {
    /// Recognized style names, used in validation error messages.
    pub const ALL: &'static [&'static str] = &["friendly", "formal", "socratic", "concise"];
}

impl fmt::Display for PersonaStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PersonaStyle::Friendly => "friendly",
            PersonaStyle::Formal => "formal",
            PersonaStyle::Socratic => "socratic",
            PersonaStyle::Concise => "concise",
        };
        f.write_str(name)
    }
}

impl FromStr for PersonaStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "friendly" => Ok(PersonaStyle::Friendly),
            "formal" => Ok(PersonaStyle::Formal),
            "socratic" => Ok(PersonaStyle::Socratic),
            "concise" => Ok(PersonaStyle::Concise),
            _ => Err(()),
        }
    }
}

/// Persona configuration for an agent profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Persona {
    pub style: PersonaStyle,
    /// How talkative the agent is, 1 (terse) to 5 (expansive).
    pub verbosity: i32,
    pub language: String,
    /// Sampling temperature forwarded to the chat provider, 0.0 to 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Agent profile - an AI conversation persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AgentProfile {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub persona: Persona,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

// ============================================================================
// ACTIVITIES
// ============================================================================

/// Lifecycle status of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// Activity - an in-progress run of a user through a course package
/// with a particular agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Activity {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: ObjectId,
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub course_package_id: ObjectId,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub agent_profile_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub current_unit_id: Option<ObjectId>,
    /// Always starts empty; populated by later interaction processing.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<String>))]
    pub memory_ids: Vec<ObjectId>,
    /// Set server-side at creation, never client-supplied.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub start_time: Timestamp,
    pub status: ActivityStatus,
}

// ============================================================================
// SESSIONS
// ============================================================================

/// Speaker role for a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A single turn of a recorded transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionTurn {
    pub role: TurnRole,
    pub content: String,
}

/// Session record - one persisted revision of an interaction transcript.
///
/// `session_id` is the client-chosen logical key; several revisions may
/// share it, and lookup by `session_id` returns the most recently
/// generated one. The compound key fields are plain strings: they are
/// foreign identifiers only in spirit, and the store never checks their
/// format or existence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionRecord {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: ObjectId,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub turns: Vec<SessionTurn>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub generated_at: Timestamp,
}

// ============================================================================
// REPORTS
// ============================================================================

/// Per-unit outcome inside an interaction report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UnitResult {
    pub unit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default)]
    pub feedback: String,
}

/// Interaction report - summarized results of one session.
///
/// Addressed by `_id` or by the compound natural key
/// `(activity_id, user_id, session_id)`; exactly one report may exist per
/// compound key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InteractionReport {
    #[serde(rename = "_id")]
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: ObjectId,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub unit_results: Vec<UnitResult>,
    /// Refreshed to the write time on every upsert or patch.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub generated_at: Timestamp,
}

// ============================================================================
// INPUT RECORDS
// ============================================================================

/// Input for creating a course package.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct NewCoursePackage {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub units: Vec<NewUnit>,
}

/// Input for one unit embedded in a course package creation request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct NewUnit {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Defaults to the unit's position in the submitted list.
    pub order: Option<i32>,
}

/// Input for creating an agent profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct NewAgentProfile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub persona: Option<NewPersona>,
}

/// Loose persona input; every recognized option is validated by
/// type/range before conversion into [`Persona`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct NewPersona {
    pub style: Option<String>,
    pub verbosity: Option<i32>,
    pub language: Option<String>,
    pub temperature: Option<f32>,
}

/// Input for creating an activity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(deny_unknown_fields)]
pub struct NewActivity {
    pub name: Option<String>,
    pub course_package_id: Option<String>,
    pub agent_profile_id: Option<String>,
    pub current_unit_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_report_serializes_with_underscore_id() {
        let report = InteractionReport {
            id: ObjectId::generate(),
            activity_id: "a".to_string(),
            user_id: "u".to_string(),
            session_id: "s".to_string(),
            user_name: String::new(),
            summary: "ok".to_string(),
            unit_results: vec![],
            generated_at: Utc::now(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("_id").is_some());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_activity_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ActivityStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<ActivityStatus>("\"completed\"").unwrap(),
            ActivityStatus::Completed
        );
    }

    #[test]
    fn test_persona_style_parse() {
        assert_eq!("socratic".parse::<PersonaStyle>(), Ok(PersonaStyle::Socratic));
        assert!("sarcastic".parse::<PersonaStyle>().is_err());
        for name in PersonaStyle::ALL {
            assert!(name.parse::<PersonaStyle>().is_ok());
        }
    }

    #[test]
    fn test_new_activity_rejects_unknown_fields() {
        let body = r#"{"name": "run", "start_time": "2026-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<NewActivity>(body).is_err());
    }

    #[test]
    fn test_session_turns_default_empty() {
        let body = r#"{
            "_id": "0123456789abcdef01234567",
            "session_id": "s1",
            "activity_id": "a1",
            "user_id": "u1",
            "generated_at": "2026-01-01T00:00:00Z"
        }"#;
        let record: SessionRecord = serde_json::from_str(body).unwrap();
        assert!(record.turns.is_empty());
    }
}
