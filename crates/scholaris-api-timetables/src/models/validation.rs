//! Validation request and result models.
//!
//! A validation result is data, never an exception: the validate endpoint
//! reports problems inside the body, and the committing endpoints wrap the
//! same result into a 409 when a placement must be refused.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of resource collision detected at a slot.
///
/// Variant order defines the reporting order: conflicts are sorted by type
/// first, then by resource id, so repeated scans of the same schedule always
/// produce the same list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    /// The teacher is already scheduled at the slot.
    Teacher,
    /// The room is already occupied at the slot.
    Room,
    /// The class already has a lesson at the slot.
    Class,
    /// A class band overlapping the target is scheduled at the slot.
    ClassBand,
}

impl ConflictType {
    /// Short noun used when labelling the conflicting resource.
    #[must_use]
    pub fn noun(&self) -> &'static str {
        match self {
            ConflictType::Teacher => "teacher",
            ConflictType::Room => "room",
            ConflictType::Class => "class",
            ConflictType::ClassBand => "class band",
        }
    }
}

/// A single detected collision between a proposed placement and an
/// existing entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleConflict {
    /// What kind of resource collides.
    pub conflict_type: ConflictType,

    /// Id of the colliding resource (teacher, room, class or class band).
    #[schema(value_type = String, format = "uuid")]
    pub resource_id: Uuid,

    /// Stable display label for the colliding resource.
    #[schema(example = "teacher 3f2a81c9")]
    pub resource_name: String,

    /// Binding behind the already-scheduled entry.
    #[schema(value_type = String, format = "uuid")]
    pub binding_id: Uuid,

    /// The already-scheduled entry occupying the slot.
    #[schema(value_type = String, format = "uuid")]
    pub entry_id: Uuid,

    /// Day of the collision (1 = Monday).
    pub day_of_week: i32,

    /// Period number of the collision.
    pub period: i32,

    /// Human-readable description of the collision.
    pub description: String,
}

/// Complete outcome of validating one proposed placement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleValidationResult {
    /// True when the placement can be committed as-is.
    pub valid: bool,

    /// Timetable the placement targets.
    #[schema(value_type = String, format = "uuid")]
    pub timetable_id: Uuid,

    /// Binding the placement schedules.
    #[schema(value_type = String, format = "uuid")]
    pub binding_id: Uuid,

    /// Requested day of week.
    pub day_of_week: i32,

    /// Requested period number.
    pub period: i32,

    /// Resource collisions at the slot, ordered by type then resource id.
    pub conflicts: Vec<ScheduleConflict>,

    /// Non-conflict problems: unresolvable binding, missing period,
    /// exhausted quota, and similar.
    pub validation_errors: Vec<String>,
}

impl ScheduleValidationResult {
    /// True when at least one resource collision was found.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Aggregated conflicts from a whole-timetable audit sweep.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConflictListResponse {
    /// Collisions in slot order; each colliding pair appears once.
    pub conflicts: Vec<ScheduleConflict>,

    /// Total count of reported collisions.
    pub total: usize,
}

impl ConflictListResponse {
    /// Build a response from detected conflicts.
    #[must_use]
    pub fn from_conflicts(conflicts: Vec<ScheduleConflict>) -> Self {
        let total = conflicts.len();
        Self { conflicts, total }
    }
}

/// Request to validate a placement without committing it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateEntryRequest {
    /// Binding to place.
    #[schema(value_type = String, format = "uuid")]
    pub binding_id: Uuid,

    /// Day of week to probe (1 = Monday .. 7 = Sunday).
    #[schema(example = 2)]
    pub day_of_week: i32,

    /// Period number to probe.
    #[schema(example = 3)]
    pub period: i32,
}

impl ValidateEntryRequest {
    /// Validate the request shape. Plan-dependent checks (day within the
    /// plan week, period exists) ride inside the validation result instead.
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
