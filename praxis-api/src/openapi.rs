//! OpenAPI Documentation
//!
//! Aggregates the utoipa path annotations from every route module into
//! one document, served at /openapi.json.

use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Praxis API",
        description = "Learning-activity tracking backend: course packages, agent profiles, \
                       activities, session transcripts, interaction reports and a chat proxy.",
        license(name = "MIT"),
    ),
    paths(
        routes::course_package::list_course_packages,
        routes::course_package::create_course_package,
        routes::agent::list_agent_profiles,
        routes::agent::create_agent_profile,
        routes::activity::list_activities,
        routes::activity::create_activity,
        routes::session::upsert_session,
        routes::session::get_session,
        routes::report::list_reports,
        routes::report::get_report,
        routes::report::upsert_report,
        routes::report::patch_report,
        routes::chat::chat_completion,
        routes::health::health,
        routes::health::db_test,
    ),
    components(schemas(
        praxis_core::CoursePackage,
        praxis_core::Unit,
        praxis_core::AgentProfile,
        praxis_core::Persona,
        praxis_core::PersonaStyle,
        praxis_core::Activity,
        praxis_core::ActivityStatus,
        praxis_core::SessionRecord,
        praxis_core::SessionTurn,
        praxis_core::TurnRole,
        praxis_core::InteractionReport,
        praxis_core::UnitResult,
        praxis_core::NewCoursePackage,
        praxis_core::NewUnit,
        praxis_core::NewAgentProfile,
        praxis_core::NewPersona,
        praxis_core::NewActivity,
        crate::envelope::ErrorEnvelope,
    )),
    tags(
        (name = "Course Packages", description = "Course package and unit management"),
        (name = "Agents", description = "Agent profile management"),
        (name = "Activities", description = "Learning activity tracking"),
        (name = "Sessions", description = "Session transcript records"),
        (name = "Reports", description = "Interaction report upserts and queries"),
        (name = "Chat", description = "Chat provider proxy"),
        (name = "Health", description = "Liveness and store connectivity"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/reports"));
        assert!(json.contains("/chat"));
        assert!(json.contains("/db/test"));
    }
}
