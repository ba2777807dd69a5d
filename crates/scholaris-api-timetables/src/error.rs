//! Error types for the timetables API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scholaris_db::DbError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ScheduleValidationResult;

/// Error response payload returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Additional structured details, when the error carries them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors for timetable, binding and entry operations.
#[derive(Debug, Error)]
pub enum TimetablesError {
    /// Timetable not found or soft-deleted.
    #[error("Timetable not found: {0}")]
    TimetableNotFound(Uuid),

    /// Binding not found or soft-deleted.
    #[error("Binding not found: {0}")]
    BindingNotFound(Uuid),

    /// Timetable entry not found or already deleted.
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    /// One or more entries in a bulk request do not exist in the timetable.
    #[error("Entries not found: {0:?}")]
    EntriesNotFound(Vec<Uuid>),

    /// Restore requested for a slot that has no deleted entry.
    #[error("No deleted entry at day {day_of_week}, period {period}")]
    NoDeletedEntryAtSlot { day_of_week: i32, period: i32 },

    /// A placement failed validation; carries the full result.
    #[error("Schedule conflict at day {}, period {}", .0.day_of_week, .0.period)]
    ScheduleConflict(ScheduleValidationResult),

    /// The request collides with existing state (e.g. duplicate timetable scope).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed or semantically invalid request input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database layer error.
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// Raw sqlx error from model queries.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for TimetablesError {
    fn into_response(self) -> Response {
        let details = match &self {
            Self::ScheduleConflict(result) => serde_json::to_value(result).ok(),
            Self::EntriesNotFound(missing) => serde_json::to_value(missing).ok(),
            _ => None,
        };

        let (status, error_code, message) = match &self {
            Self::TimetableNotFound(_)
            | Self::BindingNotFound(_)
            | Self::EntryNotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            Self::EntriesNotFound(_) => (
                StatusCode::NOT_FOUND,
                "entries_not_found",
                "One or more entries were not found in the timetable".to_string(),
            ),
            Self::NoDeletedEntryAtSlot { .. } => {
                (StatusCode::NOT_FOUND, "no_deleted_entry", self.to_string())
            }
            Self::ScheduleConflict(_) => (
                StatusCode::CONFLICT,
                "schedule_conflict",
                "The placement conflicts with the current schedule".to_string(),
            ),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            Self::Db(DbError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "not_found", msg.clone())
            }
            Self::Db(DbError::ValidationFailed(msg)) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            Self::Db(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "An internal database error occurred".to_string(),
                )
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "An internal database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convenient result alias for handler and service functions.
pub type ApiResult<T> = std::result::Result<T, TimetablesError>;
