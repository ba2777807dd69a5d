//! Handlers for timetable lifecycle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::{ErrorResponse, TimetablesError};
use crate::extractors::OrgContext;
use crate::models::{CreateTimetableRequest, TimetableResponse};
use crate::router::TimetablesState;

/// POST /timetables
///
/// Create a timetable. One live timetable per (plan settings, academic
/// year, semester) scope.
#[utoipa::path(
    post,
    path = "/timetables",
    request_body = CreateTimetableRequest,
    responses(
        (status = 201, description = "Timetable created", body = TimetableResponse),
        (status = 400, description = "Malformed request or unknown plan reference", body = ErrorResponse),
        (status = 409, description = "A timetable for the scope already exists", body = ErrorResponse),
    ),
    tag = "timetables"
)]
pub async fn create_timetable_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Json(request): Json<CreateTimetableRequest>,
) -> Result<(StatusCode, Json<TimetableResponse>), TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let timetable = state.timetables.create(organization_id, request).await?;
    Ok((StatusCode::CREATED, Json(TimetableResponse::from(timetable))))
}

/// GET /timetables/{id}
#[utoipa::path(
    get,
    path = "/timetables/{id}",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    responses(
        (status = 200, description = "Timetable", body = TimetableResponse),
        (status = 404, description = "Timetable not found", body = ErrorResponse),
    ),
    tag = "timetables"
)]
pub async fn get_timetable_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
) -> Result<Json<TimetableResponse>, TimetablesError> {
    let timetable = state.timetables.get(organization_id, timetable_id).await?;
    Ok(Json(TimetableResponse::from(timetable)))
}

/// DELETE /timetables/{id}
///
/// Soft-delete a timetable. Its entries stop counting against binding
/// quotas.
#[utoipa::path(
    delete,
    path = "/timetables/{id}",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    responses(
        (status = 204, description = "Timetable deleted"),
        (status = 404, description = "Timetable not found", body = ErrorResponse),
    ),
    tag = "timetables"
)]
pub async fn delete_timetable_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
) -> Result<StatusCode, TimetablesError> {
    state.timetables.delete(organization_id, timetable_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
