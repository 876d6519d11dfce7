//! Validation engine
//!
//! Pure, per-entity required-field and identifier-format checks. Each
//! validator consumes a loose input record and either returns the
//! converted field set or the full list of field errors. No store access
//! happens here: identifier *format* is checked, never existence.

use crate::entities::{
    NewActivity, NewAgentProfile, NewCoursePackage, Persona, PersonaStyle,
};
use crate::identity::{is_valid_identifier, ObjectId};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, "is required and must be non-empty")
    }

    pub fn bad_identifier(field: &str) -> Self {
        Self::new(field, "must be a 24-character hex identifier")
    }
}

/// Join field errors into one human-readable message.
///
/// Used only for the error-envelope `message` field, never for control
/// flow.
pub fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

fn required_string(value: &Option<String>, field: &str, errors: &mut Vec<FieldError>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.clone(),
        _ => {
            errors.push(FieldError::required(field));
            String::new()
        }
    }
}

// ============================================================================
// COURSE PACKAGE
// ============================================================================

/// Converted course-package fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CoursePackageFields {
    pub title: String,
    pub description: String,
    pub units: Vec<UnitFields>,
}

/// Converted unit fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFields {
    pub title: String,
    pub content: String,
    pub order: i32,
}

/// Validate a course package input: `title` and `description` required.
pub fn validate_course_package(
    input: &NewCoursePackage,
) -> Result<CoursePackageFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = required_string(&input.title, "title", &mut errors);
    let description = required_string(&input.description, "description", &mut errors);

    let mut units = Vec::with_capacity(input.units.len());
    for (index, unit) in input.units.iter().enumerate() {
        let field = format!("units[{}].title", index);
        let title = required_string(&unit.title, &field, &mut errors);
        units.push(UnitFields {
            title,
            content: unit.content.clone().unwrap_or_default(),
            order: unit.order.unwrap_or(index as i32),
        });
    }

    if errors.is_empty() {
        Ok(CoursePackageFields {
            title,
            description,
            units,
        })
    } else {
        Err(errors)
    }
}

// ============================================================================
// AGENT PROFILE
// ============================================================================

/// Converted agent-profile fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfileFields {
    pub name: String,
    pub description: String,
    pub persona: Persona,
}

const DEFAULT_VERBOSITY: i32 = 3;
const DEFAULT_LANGUAGE: &str = "en";

/// Validate an agent profile input.
///
/// `name` and `persona.style` are required; the remaining persona options
/// are validated by type/range when present and defaulted otherwise.
pub fn validate_agent_profile(
    input: &NewAgentProfile,
) -> Result<AgentProfileFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = required_string(&input.name, "name", &mut errors);

    let mut style = PersonaStyle::Friendly;
    let mut verbosity = DEFAULT_VERBOSITY;
    let mut language = DEFAULT_LANGUAGE.to_string();
    let mut temperature = None;

    match &input.persona {
        None => errors.push(FieldError::required("persona")),
        Some(persona) => {
            match persona.style.as_deref() {
                None => errors.push(FieldError::required("persona.style")),
                Some(raw) => match raw.parse::<PersonaStyle>() {
                    Ok(parsed) => style = parsed,
                    Err(()) => errors.push(FieldError::new(
                        "persona.style",
                        format!("must be one of: {}", PersonaStyle::ALL.join(", ")),
                    )),
                },
            }

            if let Some(v) = persona.verbosity {
                if (1..=5).contains(&v) {
                    verbosity = v;
                } else {
                    errors.push(FieldError::new("persona.verbosity", "must be between 1 and 5"));
                }
            }

            if let Some(lang) = &persona.language {
                if lang.trim().is_empty() {
                    errors.push(FieldError::new("persona.language", "must be non-empty"));
                } else {
                    language = lang.clone();
                }
            }

            if let Some(t) = persona.temperature {
                if (0.0..=1.0).contains(&t) {
                    temperature = Some(t);
                } else {
                    errors.push(FieldError::new(
                        "persona.temperature",
                        "must be between 0.0 and 1.0",
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(AgentProfileFields {
            name,
            description: input.description.clone().unwrap_or_default(),
            persona: Persona {
                style,
                verbosity,
                language,
                temperature,
            },
        })
    } else {
        Err(errors)
    }
}

// ============================================================================
// ACTIVITY
// ============================================================================

/// Converted activity fields after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityFields {
    pub name: String,
    pub course_package_id: ObjectId,
    pub agent_profile_id: ObjectId,
    pub current_unit_id: Option<ObjectId>,
}

fn required_identifier(
    value: &Option<String>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<ObjectId> {
    match value {
        None => {
            errors.push(FieldError::required(field));
            None
        }
        Some(raw) => match ObjectId::parse(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(FieldError::bad_identifier(field));
                None
            }
        },
    }
}

/// Validate an activity input: `name`, `course_package_id` and
/// `agent_profile_id` required; every identifier field present must be
/// well-formed. Absence of `current_unit_id` is legal.
pub fn validate_activity(input: &NewActivity) -> Result<ActivityFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = required_string(&input.name, "name", &mut errors);
    let course_package_id =
        required_identifier(&input.course_package_id, "course_package_id", &mut errors);
    let agent_profile_id =
        required_identifier(&input.agent_profile_id, "agent_profile_id", &mut errors);

    let current_unit_id = match &input.current_unit_id {
        None => None,
        Some(raw) if is_valid_identifier(raw) => ObjectId::parse(raw).ok(),
        Some(_) => {
            errors.push(FieldError::bad_identifier("current_unit_id"));
            None
        }
    };

    match (course_package_id, agent_profile_id) {
        (Some(course_package_id), Some(agent_profile_id)) if errors.is_empty() => {
            Ok(ActivityFields {
                name,
                course_package_id,
                agent_profile_id,
                current_unit_id,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewPersona, NewUnit};

    fn persona_input() -> NewPersona {
        NewPersona {
            style: Some("friendly".to_string()),
            verbosity: Some(2),
            language: Some("en".to_string()),
            temperature: Some(0.4),
        }
    }

    #[test]
    fn test_course_package_requires_title_and_description() {
        let errors = validate_course_package(&NewCoursePackage {
            title: None,
            description: Some("   ".to_string()),
            units: vec![],
        })
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description"]);
    }

    #[test]
    fn test_course_package_unit_order_defaults_to_position() {
        let fields = validate_course_package(&NewCoursePackage {
            title: Some("Rust".to_string()),
            description: Some("Intro".to_string()),
            units: vec![
                NewUnit {
                    title: Some("One".to_string()),
                    content: None,
                    order: None,
                },
                NewUnit {
                    title: Some("Two".to_string()),
                    content: None,
                    order: Some(9),
                },
            ],
        })
        .unwrap();

        assert_eq!(fields.units[0].order, 0);
        assert_eq!(fields.units[1].order, 9);
    }

    #[test]
    fn test_agent_profile_empty_name_rejected() {
        let errors = validate_agent_profile(&NewAgentProfile {
            name: Some("".to_string()),
            description: None,
            persona: Some(persona_input()),
        })
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
        assert!(!format_errors(&errors).is_empty());
    }

    #[test]
    fn test_agent_profile_unknown_style_rejected() {
        let mut persona = persona_input();
        persona.style = Some("sarcastic".to_string());
        let errors = validate_agent_profile(&NewAgentProfile {
            name: Some("Tutor".to_string()),
            description: None,
            persona: Some(persona),
        })
        .unwrap_err();

        assert_eq!(errors[0].field, "persona.style");
        assert!(errors[0].message.contains("friendly"));
    }

    #[test]
    fn test_agent_profile_range_checks() {
        let mut persona = persona_input();
        persona.verbosity = Some(9);
        persona.temperature = Some(1.5);
        let errors = validate_agent_profile(&NewAgentProfile {
            name: Some("Tutor".to_string()),
            description: None,
            persona: Some(persona),
        })
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["persona.verbosity", "persona.temperature"]);
    }

    #[test]
    fn test_agent_profile_defaults_applied() {
        let fields = validate_agent_profile(&NewAgentProfile {
            name: Some("Tutor".to_string()),
            description: None,
            persona: Some(NewPersona {
                style: Some("formal".to_string()),
                verbosity: None,
                language: None,
                temperature: None,
            }),
        })
        .unwrap();

        assert_eq!(fields.persona.verbosity, DEFAULT_VERBOSITY);
        assert_eq!(fields.persona.language, DEFAULT_LANGUAGE);
        assert_eq!(fields.persona.temperature, None);
    }

    #[test]
    fn test_activity_identifier_format_checked() {
        let errors = validate_activity(&NewActivity {
            name: Some("run".to_string()),
            course_package_id: Some("not-hex".to_string()),
            agent_profile_id: Some("0123456789abcdef01234567".to_string()),
            current_unit_id: None,
        })
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "course_package_id");
    }

    #[test]
    fn test_activity_current_unit_optional() {
        let fields = validate_activity(&NewActivity {
            name: Some("run".to_string()),
            course_package_id: Some("0123456789abcdef01234567".to_string()),
            agent_profile_id: Some("89abcdef0123456701234567".to_string()),
            current_unit_id: None,
        })
        .unwrap();

        assert!(fields.current_unit_id.is_none());
    }

    #[test]
    fn test_format_errors_joins_all() {
        let errors = vec![
            FieldError::new("title", "is required and must be non-empty"),
            FieldError::new("description", "is required and must be non-empty"),
        ];
        let message = format_errors(&errors);
        assert!(message.contains("title"));
        assert!(message.contains("description"));
        assert!(message.contains("; "));
    }
}
