//! Request and response models for timetable entries.

use chrono::{DateTime, Utc};
use scholaris_db::models::{EntryState, TimetableEntry};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Upper bound on ids accepted by a single bulk lock request.
pub const MAX_BULK_LOCK_IDS: usize = 500;

/// Request to place a binding at a slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEntryRequest {
    /// Binding to schedule.
    #[schema(value_type = String, format = "uuid")]
    pub binding_id: Uuid,

    /// Day of week (1 = Monday .. 7 = Sunday).
    #[schema(example = 2)]
    pub day_of_week: i32,

    /// Period number within the day.
    #[schema(example = 3)]
    pub period: i32,

    /// Create the entry as a draft. Drafts occupy their slot like any
    /// committed entry. Defaults to false.
    #[serde(default)]
    #[schema(default = false)]
    pub is_draft: bool,
}

impl CreateEntryRequest {
    /// Validate the request shape.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if !(1..=7).contains(&self.day_of_week) {
            return Some("day_of_week must be between 1 and 7".to_string());
        }
        if self.period < 1 {
            return Some("period must be a positive number".to_string());
        }
        None
    }
}

/// Request to restore the most recently deleted entry at a slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestoreEntryRequest {
    /// Day of week of the slot (1 = Monday .. 7 = Sunday).
    #[schema(example = 2)]
    pub day_of_week: i32,

    /// Period number of the slot.
    #[schema(example = 3)]
    pub period: i32,
}

impl RestoreEntryRequest {
    /// Validate the request shape.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if !(1..=7).contains(&self.day_of_week) {
            return Some("day_of_week must be between 1 and 7".to_string());
        }
        if self.period < 1 {
            return Some("period must be a positive number".to_string());
        }
        None
    }
}

/// Request to lock or unlock a set of entries in one timetable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkLockRequest {
    /// Entries to update. All must exist in the timetable or the whole
    /// request is rejected.
    pub entry_ids: Vec<Uuid>,

    /// Desired lock state.
    pub is_locked: bool,
}

impl BulkLockRequest {
    /// Validate the request shape.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.entry_ids.is_empty() {
            return Some("entry_ids must not be empty".to_string());
        }
        if self.entry_ids.len() > MAX_BULK_LOCK_IDS {
            return Some(format!(
                "entry_ids must contain at most {MAX_BULK_LOCK_IDS} ids"
            ));
        }
        None
    }
}

/// A timetable entry as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryResponse {
    /// Entry id.
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,

    /// Timetable the entry belongs to.
    #[schema(value_type = String, format = "uuid")]
    pub timetable_id: Uuid,

    /// Binding the entry schedules.
    #[schema(value_type = String, format = "uuid")]
    pub binding_id: Uuid,

    /// Teacher resource captured at placement time.
    #[schema(value_type = String, format = "uuid")]
    pub teacher_id: Uuid,

    /// Subject captured at placement time.
    #[schema(value_type = String, format = "uuid")]
    pub subject_id: Uuid,

    /// Room resource captured at placement time.
    #[schema(value_type = String, format = "uuid")]
    pub room_id: Uuid,

    /// Scheduled class, when the entry targets a single class.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_id: Option<Uuid>,

    /// Scheduled class band, when the entry targets a band.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_band_id: Option<Uuid>,

    /// True when the entry targets a class band.
    pub is_class_band_entry: bool,

    /// Day of week (1 = Monday).
    pub day_of_week: i32,

    /// Period number within the day.
    pub period: i32,

    /// Protected from bulk and automated modification.
    pub is_locked: bool,

    /// Draft placement, not yet committed by the planner.
    pub is_draft: bool,

    /// Lifecycle state of the entry.
    pub state: EntryState,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<TimetableEntry> for EntryResponse {
    fn from(entry: TimetableEntry) -> Self {
        Self {
            id: entry.id,
            timetable_id: entry.timetable_id,
            binding_id: entry.binding_id,
            teacher_id: entry.teacher_id,
            subject_id: entry.subject_id,
            room_id: entry.room_id,
            class_id: entry.class_id,
            class_band_id: entry.class_band_id,
            is_class_band_entry: entry.is_class_band_entry(),
            day_of_week: entry.day_of_week,
            period: entry.period,
            is_locked: entry.is_locked,
            is_draft: entry.is_draft,
            state: entry.state(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// A list of entries, used by the grid view, restore and bulk lock
/// responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryListResponse {
    /// Entries ordered by day, period, then creation time.
    pub entries: Vec<EntryResponse>,

    /// Total count of returned entries.
    pub total: usize,
}

impl EntryListResponse {
    /// Build a response from model rows.
    #[must_use]
    pub fn from_entries(entries: Vec<TimetableEntry>) -> Self {
        let entries: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();
        let total = entries.len();
        Self { entries, total }
    }
}

/// Query parameters for the entries grid view.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EntryListQuery {
    /// Restrict to one day of week.
    pub day_of_week: Option<i32>,

    /// Restrict to one period number.
    pub period: Option<i32>,
}
