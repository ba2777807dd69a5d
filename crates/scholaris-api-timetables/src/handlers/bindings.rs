//! Handlers for binding lifecycle and the scheduling summary.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::{ErrorResponse, TimetablesError};
use crate::extractors::OrgContext;
use crate::models::{
    BindingResponse, CreateBindingRequest, SchedulingSummaryResponse, UpdateBindingRequest,
};
use crate::router::TimetablesState;

/// POST /bindings
///
/// Create a binding: a required weekly teaching assignment.
#[utoipa::path(
    post,
    path = "/bindings",
    request_body = CreateBindingRequest,
    responses(
        (status = 201, description = "Binding created", body = BindingResponse),
        (status = 400, description = "Malformed request or unknown plan/band reference", body = ErrorResponse),
    ),
    tag = "bindings"
)]
pub async fn create_binding_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Json(request): Json<CreateBindingRequest>,
) -> Result<(StatusCode, Json<BindingResponse>), TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let binding = state.bindings.create(organization_id, request).await?;
    Ok((StatusCode::CREATED, Json(BindingResponse::from(binding))))
}

/// GET /bindings/{id}
#[utoipa::path(
    get,
    path = "/bindings/{id}",
    params(
        ("id" = Uuid, Path, description = "Binding ID")
    ),
    responses(
        (status = 200, description = "Binding", body = BindingResponse),
        (status = 404, description = "Binding not found", body = ErrorResponse),
    ),
    tag = "bindings"
)]
pub async fn get_binding_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(binding_id): Path<Uuid>,
) -> Result<Json<BindingResponse>, TimetablesError> {
    let binding = state.bindings.get(organization_id, binding_id).await?;
    Ok(Json(BindingResponse::from(binding)))
}

/// PATCH /bindings/{id}
///
/// Partially update a binding. Lowering the quota below the scheduled
/// count is allowed; the overage is reported via the summary, never
/// clamped.
#[utoipa::path(
    patch,
    path = "/bindings/{id}",
    params(
        ("id" = Uuid, Path, description = "Binding ID")
    ),
    request_body = UpdateBindingRequest,
    responses(
        (status = 200, description = "Updated binding", body = BindingResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "Binding not found", body = ErrorResponse),
    ),
    tag = "bindings"
)]
pub async fn update_binding_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(binding_id): Path<Uuid>,
    Json(request): Json<UpdateBindingRequest>,
) -> Result<Json<BindingResponse>, TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let binding = state
        .bindings
        .update(organization_id, binding_id, request)
        .await?;
    Ok(Json(BindingResponse::from(binding)))
}

/// DELETE /bindings/{id}
///
/// Soft-delete a binding. Existing entries stand; new placements are
/// rejected.
#[utoipa::path(
    delete,
    path = "/bindings/{id}",
    params(
        ("id" = Uuid, Path, description = "Binding ID")
    ),
    responses(
        (status = 204, description = "Binding deleted"),
        (status = 404, description = "Binding not found", body = ErrorResponse),
    ),
    tag = "bindings"
)]
pub async fn delete_binding_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(binding_id): Path<Uuid>,
) -> Result<StatusCode, TimetablesError> {
    state.bindings.delete(organization_id, binding_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /bindings/{id}/scheduling-summary
///
/// Scheduled-versus-quota report for one binding.
#[utoipa::path(
    get,
    path = "/bindings/{id}/scheduling-summary",
    params(
        ("id" = Uuid, Path, description = "Binding ID")
    ),
    responses(
        (status = 200, description = "Scheduling summary", body = SchedulingSummaryResponse),
        (status = 404, description = "Binding not found", body = ErrorResponse),
    ),
    tag = "bindings"
)]
pub async fn scheduling_summary_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(binding_id): Path<Uuid>,
) -> Result<Json<SchedulingSummaryResponse>, TimetablesError> {
    let binding = state.bindings.get(organization_id, binding_id).await?;
    let summary = state.quota.summary_for(&binding).await?;
    Ok(Json(SchedulingSummaryResponse::from(summary)))
}
