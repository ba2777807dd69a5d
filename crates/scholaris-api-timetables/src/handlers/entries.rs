//! Handlers for entry placement, lifecycle, and timetable views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::{ErrorResponse, TimetablesError};
use crate::extractors::OrgContext;
use crate::models::{
    BulkLockRequest, ConflictListResponse, CreateEntryRequest, EntryListQuery, EntryListResponse,
    EntryResponse, RestoreEntryRequest, ScheduleValidationResult, ValidateEntryRequest,
};
use crate::router::TimetablesState;

/// POST /timetables/{id}/entries/validate
///
/// Probe a placement without committing anything. Always answers 200 for
/// a well-formed request; conflicts and validation errors ride inside
/// the result.
#[utoipa::path(
    post,
    path = "/timetables/{id}/entries/validate",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    request_body = ValidateEntryRequest,
    responses(
        (status = 200, description = "Validation result", body = ScheduleValidationResult),
        (status = 400, description = "Malformed request", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn validate_entry_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
    Json(request): Json<ValidateEntryRequest>,
) -> Result<Json<ScheduleValidationResult>, TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let result = state
        .validator
        .validate(organization_id, timetable_id, &request)
        .await?;
    Ok(Json(result))
}

/// POST /timetables/{id}/entries
///
/// Validate and commit a manual placement in one transaction.
#[utoipa::path(
    post,
    path = "/timetables/{id}/entries",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 409, description = "Placement rejected; details carry the full validation result", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn create_entry_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
    Json(request): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let entry = state
        .lifecycle
        .create_manual_entry(organization_id, timetable_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(EntryResponse::from(entry))))
}

/// DELETE /entries/{entry_id}
///
/// Soft-delete an entry; the slot frees immediately.
#[utoipa::path(
    delete,
    path = "/entries/{entry_id}",
    params(
        ("entry_id" = Uuid, Path, description = "Entry ID")
    ),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Entry not found or already deleted", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn remove_entry_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(entry_id): Path<Uuid>,
) -> Result<StatusCode, TimetablesError> {
    state
        .lifecycle
        .remove_entry(organization_id, entry_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /timetables/{id}/entries/restore
///
/// Restore the most recently deleted entry at a slot and return the
/// slot's active entries.
#[utoipa::path(
    post,
    path = "/timetables/{id}/entries/restore",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    request_body = RestoreEntryRequest,
    responses(
        (status = 200, description = "Entry restored; body holds the updated slot view", body = EntryListResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "Timetable missing or no deleted entry at the slot", body = ErrorResponse),
        (status = 409, description = "Slot was reused since the deletion", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn restore_entry_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
    Json(request): Json<RestoreEntryRequest>,
) -> Result<Json<EntryListResponse>, TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let entries = state
        .lifecycle
        .restore_entry(organization_id, timetable_id, &request)
        .await?;
    Ok(Json(EntryListResponse::from_entries(entries)))
}

/// PUT /timetables/{id}/entries/lock-status
///
/// Lock or unlock a set of entries, all-or-nothing.
#[utoipa::path(
    put,
    path = "/timetables/{id}/entries/lock-status",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    request_body = BulkLockRequest,
    responses(
        (status = 200, description = "Updated entries", body = EntryListResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "Timetable or one of the entries not found", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn bulk_lock_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
    Json(request): Json<BulkLockRequest>,
) -> Result<Json<EntryListResponse>, TimetablesError> {
    if let Some(error) = request.validate() {
        return Err(TimetablesError::Validation(error));
    }

    let entries = state
        .lifecycle
        .bulk_update_lock_status(organization_id, timetable_id, &request)
        .await?;
    Ok(Json(EntryListResponse::from_entries(entries)))
}

/// GET /timetables/{id}/entries
///
/// Grid view of a timetable's active entries, optionally narrowed to one
/// day or period.
#[utoipa::path(
    get,
    path = "/timetables/{id}/entries",
    params(
        ("id" = Uuid, Path, description = "Timetable ID"),
        ("day_of_week" = Option<i32>, Query, description = "Restrict to one day"),
        ("period" = Option<i32>, Query, description = "Restrict to one period"),
    ),
    responses(
        (status = 200, description = "Active entries ordered by day, period, creation time", body = EntryListResponse),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
        (status = 404, description = "Timetable not found", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn list_entries_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<EntryListResponse>, TimetablesError> {
    if let Some(day) = query.day_of_week {
        if !(1..=7).contains(&day) {
            return Err(TimetablesError::Validation(
                "day_of_week must be between 1 and 7".to_string(),
            ));
        }
    }
    if let Some(period) = query.period {
        if period < 1 {
            return Err(TimetablesError::Validation(
                "period must be a positive number".to_string(),
            ));
        }
    }

    let entries = state
        .timetables
        .list_entries(organization_id, timetable_id, &query)
        .await?;
    Ok(Json(EntryListResponse::from_entries(entries)))
}

/// GET /timetables/{id}/conflicts
///
/// Audit sweep: re-run the pairwise conflict scan over every occupied
/// slot of the timetable.
#[utoipa::path(
    get,
    path = "/timetables/{id}/conflicts",
    params(
        ("id" = Uuid, Path, description = "Timetable ID")
    ),
    responses(
        (status = 200, description = "Every collision among committed entries, in slot order", body = ConflictListResponse),
        (status = 404, description = "Timetable not found", body = ErrorResponse),
    ),
    tag = "timetable-entries"
)]
pub async fn timetable_conflicts_handler(
    State(state): State<TimetablesState>,
    OrgContext(organization_id): OrgContext,
    Path(timetable_id): Path<Uuid>,
) -> Result<Json<ConflictListResponse>, TimetablesError> {
    state.timetables.get(organization_id, timetable_id).await?;

    let conflicts = state
        .detector
        .audit_timetable(organization_id, timetable_id)
        .await?;
    Ok(Json(ConflictListResponse::from_conflicts(conflicts)))
}
