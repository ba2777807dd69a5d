//! Request and response models for bindings.

use chrono::{DateTime, Utc};
use scholaris_db::models::{Binding, BindingStatus, SchedulingTarget, UpdateBinding};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request to create a binding.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBindingRequest {
    /// Planning configuration the binding belongs to.
    #[schema(value_type = String, format = "uuid")]
    pub plan_settings_id: Uuid,

    /// Teacher assigned to the lessons.
    #[schema(value_type = String, format = "uuid")]
    pub teacher_id: Uuid,

    /// Subject taught.
    #[schema(value_type = String, format = "uuid")]
    pub subject_id: Uuid,

    /// Room the lessons take place in.
    #[schema(value_type = String, format = "uuid")]
    pub room_id: Uuid,

    /// Target class. Exactly one of `class_id` and `class_band_id` must
    /// be set.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_id: Option<Uuid>,

    /// Target class band. Exactly one of `class_id` and `class_band_id`
    /// must be set.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_band_id: Option<Uuid>,

    /// Weekly period quota. Must be at least 1.
    #[schema(example = 3)]
    pub periods_per_week: i32,

    /// Pin all entries of this binding against bulk and automated
    /// changes. Defaults to false.
    pub is_fixed: Option<bool>,

    /// Scheduling priority, 0 (lowest) to 10 (highest). Defaults to 5.
    #[schema(example = 5)]
    pub priority: Option<i32>,
}

impl CreateBindingRequest {
    /// Validate the request.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.target().is_none() {
            return Some(
                "Exactly one of class_id and class_band_id must be set".to_string(),
            );
        }
        if self.periods_per_week < 1 {
            return Some("periods_per_week must be at least 1".to_string());
        }
        if let Some(priority) = self.priority {
            if !(0..=10).contains(&priority) {
                return Some("priority must be between 0 and 10".to_string());
            }
        }
        None
    }

    /// The scheduling target, when exactly one side is set.
    #[must_use]
    pub fn target(&self) -> Option<SchedulingTarget> {
        SchedulingTarget::from_columns(self.class_id, self.class_band_id)
    }
}

/// Request to update a binding. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBindingRequest {
    /// New teacher.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub teacher_id: Option<Uuid>,

    /// New subject.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub subject_id: Option<Uuid>,

    /// New room.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub room_id: Option<Uuid>,

    /// Retarget to a single class. Mutually exclusive with
    /// `class_band_id`; setting either replaces the previous target.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_id: Option<Uuid>,

    /// Retarget to a class band. Mutually exclusive with `class_id`.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_band_id: Option<Uuid>,

    /// New weekly quota. Lowering it below the scheduled count is
    /// allowed; the binding is then reported as overscheduled.
    pub periods_per_week: Option<i32>,

    /// New fixed flag.
    pub is_fixed: Option<bool>,

    /// New priority, 0 to 10.
    pub priority: Option<i32>,

    /// New lifecycle status.
    pub status: Option<BindingStatus>,
}

impl UpdateBindingRequest {
    /// Validate the request.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.class_id.is_some() && self.class_band_id.is_some() {
            return Some(
                "Only one of class_id and class_band_id may be set".to_string(),
            );
        }
        if let Some(quota) = self.periods_per_week {
            if quota < 1 {
                return Some("periods_per_week must be at least 1".to_string());
            }
        }
        if let Some(priority) = self.priority {
            if !(0..=10).contains(&priority) {
                return Some("priority must be between 0 and 10".to_string());
            }
        }
        None
    }

    /// The new scheduling target, when the request changes it.
    #[must_use]
    pub fn target(&self) -> Option<SchedulingTarget> {
        SchedulingTarget::from_columns(self.class_id, self.class_band_id)
    }

    /// Convert into the model-layer update struct.
    #[must_use]
    pub fn into_update(self) -> UpdateBinding {
        let target = self.target();
        UpdateBinding {
            teacher_id: self.teacher_id,
            subject_id: self.subject_id,
            room_id: self.room_id,
            target,
            periods_per_week: self.periods_per_week,
            is_fixed: self.is_fixed,
            priority: self.priority,
            status: self.status,
        }
    }
}

/// A binding as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BindingResponse {
    /// Binding id.
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,

    /// Owning organization.
    #[schema(value_type = String, format = "uuid")]
    pub organization_id: Uuid,

    /// Planning configuration.
    #[schema(value_type = String, format = "uuid")]
    pub plan_settings_id: Uuid,

    /// Teacher.
    #[schema(value_type = String, format = "uuid")]
    pub teacher_id: Uuid,

    /// Subject.
    #[schema(value_type = String, format = "uuid")]
    pub subject_id: Uuid,

    /// Room.
    #[schema(value_type = String, format = "uuid")]
    pub room_id: Uuid,

    /// Target class, when the binding schedules a single class.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_id: Option<Uuid>,

    /// Target class band, when the binding schedules a band.
    #[schema(value_type = Option<String>, format = "uuid")]
    pub class_band_id: Option<Uuid>,

    /// Weekly period quota.
    pub periods_per_week: i32,

    /// Pinned against bulk and automated changes.
    pub is_fixed: bool,

    /// Scheduling priority, 0 to 10.
    pub priority: i32,

    /// Lifecycle status.
    pub status: BindingStatus,

    /// When the binding was created.
    pub created_at: DateTime<Utc>,

    /// When the binding was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<Binding> for BindingResponse {
    fn from(binding: Binding) -> Self {
        Self {
            id: binding.id,
            organization_id: binding.organization_id,
            plan_settings_id: binding.plan_settings_id,
            teacher_id: binding.teacher_id,
            subject_id: binding.subject_id,
            room_id: binding.room_id,
            class_id: binding.class_id,
            class_band_id: binding.class_band_id,
            periods_per_week: binding.periods_per_week,
            is_fixed: binding.is_fixed,
            priority: binding.priority,
            status: binding.status,
            created_at: binding.created_at,
            updated_at: binding.updated_at,
        }
    }
}

/// Scheduled-versus-quota summary for one binding.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchedulingSummaryResponse {
    /// Binding the summary describes.
    #[schema(value_type = String, format = "uuid")]
    pub binding_id: Uuid,

    /// Weekly quota.
    pub total_periods: i64,

    /// Active entries currently scheduled across non-deleted timetables.
    pub scheduled_periods: i64,

    /// Quota still open. Never negative.
    pub remaining_periods: i64,

    /// True when more periods are scheduled than the quota allows.
    pub is_overscheduled: bool,
}
