//! OpenAPI document and the Swagger UI that serves it.
//!
//! The generated spec aggregates every handler the binary mounts: the
//! health probes defined here plus the timetable, entry and binding
//! operations exported by `scholaris-api-timetables`.

use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::health::{
    DependencyCheck, HealthResponse, HealthState, LivenessResponse, ReadinessResponse,
};
use crate::state::AppState;

/// Registers the `X-Organization-Id` header as a security scheme so the
/// Swagger UI offers an input for it.
struct OrgHeaderAddon;

impl Modify for OrgHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "organizationHeader",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Organization-Id"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "scholaris Scheduler API",
        version = "0.1.0",
        description = "Timetable placement and conflict-validation API for scholaris",
        contact(name = "scholaris Team")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server")
    ),
    modifiers(&OrgHeaderAddon),
    tags(
        (name = "health", description = "Service health and status"),
        (name = "timetables", description = "Timetable lifecycle"),
        (name = "timetable-entries", description = "Placement validation, commits, and entry lifecycle"),
        (name = "bindings", description = "Teacher/subject/target assignments and quota summaries")
    ),
    paths(
        // Health
        crate::health::health_handler,
        crate::health::live_handler,
        crate::health::ready_handler,
        // Timetables
        scholaris_api_timetables::handlers::timetables::create_timetable_handler,
        scholaris_api_timetables::handlers::timetables::get_timetable_handler,
        scholaris_api_timetables::handlers::timetables::delete_timetable_handler,
        // Entries
        scholaris_api_timetables::handlers::entries::validate_entry_handler,
        scholaris_api_timetables::handlers::entries::create_entry_handler,
        scholaris_api_timetables::handlers::entries::remove_entry_handler,
        scholaris_api_timetables::handlers::entries::restore_entry_handler,
        scholaris_api_timetables::handlers::entries::bulk_lock_handler,
        scholaris_api_timetables::handlers::entries::list_entries_handler,
        scholaris_api_timetables::handlers::entries::timetable_conflicts_handler,
        // Bindings
        scholaris_api_timetables::handlers::bindings::create_binding_handler,
        scholaris_api_timetables::handlers::bindings::get_binding_handler,
        scholaris_api_timetables::handlers::bindings::update_binding_handler,
        scholaris_api_timetables::handlers::bindings::delete_binding_handler,
        scholaris_api_timetables::handlers::bindings::scheduling_summary_handler,
    ),
    components(schemas(
        // Health
        HealthResponse,
        HealthState,
        DependencyCheck,
        LivenessResponse,
        ReadinessResponse,
        // Errors
        scholaris_api_timetables::error::ErrorResponse,
        // Validation
        scholaris_api_timetables::models::ValidateEntryRequest,
        scholaris_api_timetables::models::ScheduleValidationResult,
        scholaris_api_timetables::models::ScheduleConflict,
        scholaris_api_timetables::models::ConflictType,
        scholaris_api_timetables::models::ConflictListResponse,
        // Entries
        scholaris_api_timetables::models::CreateEntryRequest,
        scholaris_api_timetables::models::RestoreEntryRequest,
        scholaris_api_timetables::models::BulkLockRequest,
        scholaris_api_timetables::models::EntryResponse,
        scholaris_api_timetables::models::EntryListResponse,
        // Bindings
        scholaris_api_timetables::models::CreateBindingRequest,
        scholaris_api_timetables::models::UpdateBindingRequest,
        scholaris_api_timetables::models::BindingResponse,
        scholaris_api_timetables::models::SchedulingSummaryResponse,
        // Timetables
        scholaris_api_timetables::models::CreateTimetableRequest,
        scholaris_api_timetables::models::TimetableResponse,
        // Shared enums
        scholaris_db::models::BindingStatus,
        scholaris_db::models::EntryState,
        scholaris_db::models::TimetableStatus,
    ))
)]
pub struct ApiDoc;

/// Swagger UI at `/docs`, raw document at `/api-doc/openapi.json`.
pub fn swagger_routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_and_names_the_service() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("document should serialize");
        assert!(json.contains("scholaris Scheduler API"));
    }

    #[test]
    fn document_covers_every_mounted_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/health",
            "/health/live",
            "/health/ready",
            "/timetables",
            "/timetables/{id}",
            "/timetables/{id}/entries",
            "/timetables/{id}/entries/validate",
            "/timetables/{id}/entries/restore",
            "/timetables/{id}/entries/lock-status",
            "/timetables/{id}/conflicts",
            "/entries/{entry_id}",
            "/bindings",
            "/bindings/{id}",
            "/bindings/{id}/scheduling-summary",
        ] {
            assert!(paths.contains_key(path), "document is missing {path}");
        }
    }

    #[test]
    fn document_exports_domain_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;

        for schema in [
            "HealthResponse",
            "ErrorResponse",
            "ScheduleValidationResult",
            "ScheduleConflict",
            "CreateEntryRequest",
            "BindingResponse",
            "SchedulingSummaryResponse",
        ] {
            assert!(schemas.contains_key(schema), "document is missing {schema}");
        }
    }

    #[test]
    fn org_header_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("organizationHeader"));
    }
}
