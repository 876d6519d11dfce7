//! Praxis Core - Entity Types
//!
//! Identity, entity schemas, validation and error enums for the Praxis
//! learning-activity tracking backend. Pure data and pure functions; no
//! store or network access happens in this crate.

pub mod entities;
pub mod error;
pub mod identity;
pub mod validation;

pub use entities::{
    Activity, ActivityStatus, AgentProfile, CoursePackage, InteractionReport, NewActivity,
    NewAgentProfile, NewCoursePackage, NewPersona, NewUnit, Persona, PersonaStyle, SessionRecord,
    SessionTurn, TurnRole, Unit, UnitResult,
};
pub use error::{ChatError, PraxisError, PraxisResult, StoreError};
pub use identity::{is_valid_identifier, InvalidObjectId, ObjectId, Timestamp, OBJECT_ID_LEN};
pub use validation::{
    format_errors, validate_activity, validate_agent_profile, validate_course_package,
    ActivityFields, AgentProfileFields, CoursePackageFields, FieldError, UnitFields,
};
