//! Request and response models for timetables.

use chrono::{DateTime, Utc};
use scholaris_db::models::{Timetable, TimetableStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request to create a timetable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTimetableRequest {
    /// Planning configuration the timetable is built against.
    #[schema(value_type = String, format = "uuid")]
    pub plan_settings_id: Uuid,

    /// Academic year label, e.g. "2025/2026".
    #[schema(example = "2025/2026")]
    pub academic_year: String,

    /// Semester number within the academic year.
    #[schema(example = 1)]
    pub semester: i32,

    /// Display name.
    #[schema(example = "Autumn draft")]
    pub name: String,

    /// Initial status. Defaults to draft.
    pub status: Option<TimetableStatus>,
}

impl CreateTimetableRequest {
    /// Validate the request.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.academic_year.trim().is_empty() {
            return Some("academic_year is required".to_string());
        }
        if self.academic_year.len() > 32 {
            return Some("academic_year must be at most 32 characters".to_string());
        }
        if self.semester < 1 {
            return Some("semester must be a positive number".to_string());
        }
        if self.name.trim().is_empty() {
            return Some("name is required".to_string());
        }
        if self.name.len() > 255 {
            return Some("name must be at most 255 characters".to_string());
        }
        None
    }
}

/// A timetable as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimetableResponse {
    /// Timetable id.
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,

    /// Owning organization.
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: Uuid,

    /// Planning configuration.
    #[schema(value_type = String, format = "uuid")]
    pub plan_settings_id: Uuid,

    /// Academic year label.
    #[schema(example = "2025/2026")]
    pub academic_year: String,

    /// Semester number.
    pub semester: i32,

    /// Display name.
    pub name: String,

    /// Lifecycle status.
    pub status: TimetableStatus,

    /// When the timetable was created.
    pub created_at: DateTime<Utc>,

    /// When the timetable was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<Timetable> for TimetableResponse {
    fn from(timetable: Timetable) -> Self {
        Self {
            id: timetable.id,
            organization_id: timetable.organization_id,
            plan_settings_id: timetable.plan_settings_id,
            academic_year: timetable.academic_year,
            semester: timetable.semester,
            name: timetable.name,
            status: timetable.status,
            created_at: timetable.created_at,
            updated_at: timetable.updated_at,
        }
    }
}
