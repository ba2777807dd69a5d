//! Binding model.
//!
//! A binding is a required weekly teaching assignment: teacher, subject,
//! room, and exactly one of class or class band, with a periods-per-week
//! quota. Entries denormalize these fields at placement time.

use chrono::{DateTime, Utc};
use scholaris_core::{OrgScoped, OrganizationId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle status of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BindingStatus {
    /// Accepts new placements.
    Active,
    /// Temporarily paused; existing entries stand, new placements are rejected.
    Suspended,
}

impl fmt::Display for BindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingStatus::Active => write!(f, "active"),
            BindingStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl FromStr for BindingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(BindingStatus::Active),
            "suspended" => Ok(BindingStatus::Suspended),
            _ => Err(format!("Unknown binding status: {s}")),
        }
    }
}

/// The unit a binding schedules: a single class or a class band.
///
/// Stored as two nullable columns with a CHECK that exactly one is set;
/// modeled as a sum type so call sites cannot forget the band case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingTarget {
    Class(Uuid),
    ClassBand(Uuid),
}

impl SchedulingTarget {
    /// The id of the targeted class or band.
    #[must_use]
    pub fn resource_id(&self) -> Uuid {
        match self {
            SchedulingTarget::Class(id) | SchedulingTarget::ClassBand(id) => *id,
        }
    }

    /// Whether this target is a class band.
    #[must_use]
    pub fn is_class_band(&self) -> bool {
        matches!(self, SchedulingTarget::ClassBand(_))
    }

    /// The (class_id, class_band_id) column pair for persistence.
    #[must_use]
    pub fn into_columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            SchedulingTarget::Class(id) => (Some(id), None),
            SchedulingTarget::ClassBand(id) => (None, Some(id)),
        }
    }

    /// Reassemble a target from the stored column pair.
    #[must_use]
    pub fn from_columns(class_id: Option<Uuid>, class_band_id: Option<Uuid>) -> Option<Self> {
        match (class_id, class_band_id) {
            (Some(id), None) => Some(SchedulingTarget::Class(id)),
            (None, Some(id)) => Some(SchedulingTarget::ClassBand(id)),
            _ => None,
        }
    }
}

/// A required weekly teaching assignment.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Binding {
    /// Unique identifier.
    pub id: Uuid,

    /// The organization this binding belongs to.
    pub organization_id: Uuid,

    /// The planning configuration this binding belongs to.
    pub plan_settings_id: Uuid,

    /// The assigned teacher (resolved externally).
    pub teacher_id: Uuid,

    /// The taught subject (resolved externally).
    pub subject_id: Uuid,

    /// The assigned room (resolved externally).
    pub room_id: Uuid,

    /// Targeted class; mutually exclusive with `class_band_id`.
    pub class_id: Option<Uuid>,

    /// Targeted class band; mutually exclusive with `class_id`.
    pub class_band_id: Option<Uuid>,

    /// Weekly period quota.
    pub periods_per_week: i32,

    /// Fixed bindings are exempt from bulk and automated mutation.
    pub is_fixed: bool,

    /// Tie-break hint for automated placement (0-10); not enforced here.
    pub priority: i32,

    /// Lifecycle status.
    pub status: BindingStatus,

    /// Soft-delete flag.
    pub is_deleted: bool,

    /// When the binding was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the binding was created.
    pub created_at: DateTime<Utc>,

    /// When the binding was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBinding {
    pub organization_id: Uuid,
    pub plan_settings_id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub room_id: Uuid,
    pub class_id: Option<Uuid>,
    pub class_band_id: Option<Uuid>,
    pub periods_per_week: i32,
    pub is_fixed: Option<bool>,
    pub priority: Option<i32>,
}

/// Data for partially updating a binding.
#[derive(Debug, Clone, Default)]
pub struct UpdateBinding {
    pub teacher_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    /// Replaces the target atomically; sets one column, clears the other.
    pub target: Option<SchedulingTarget>,
    pub periods_per_week: Option<i32>,
    pub is_fixed: Option<bool>,
    pub priority: Option<i32>,
    pub status: Option<BindingStatus>,
}

impl Binding {
    /// Find a binding by ID within an organization.
    ///
    /// Returns soft-deleted rows too; callers decide how a deleted binding
    /// is reported.
    pub async fn find_by_id<'e, E>(
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            SELECT * FROM bindings
            WHERE id = $1 AND organization_id = $2
            ",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await
    }

    /// Create a new binding.
    pub async fn create(pool: &sqlx::PgPool, input: CreateBinding) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO bindings (
                organization_id, plan_settings_id, teacher_id, subject_id, room_id,
                class_id, class_band_id, periods_per_week, is_fixed, priority
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, COALESCE($9, false), COALESCE($10, 5)
            )
            RETURNING *
            ",
        )
        .bind(input.organization_id)
        .bind(input.plan_settings_id)
        .bind(input.teacher_id)
        .bind(input.subject_id)
        .bind(input.room_id)
        .bind(input.class_id)
        .bind(input.class_band_id)
        .bind(input.periods_per_week)
        .bind(input.is_fixed)
        .bind(input.priority)
        .fetch_one(pool)
        .await
    }

    /// Partially update a binding.
    pub async fn update(
        pool: &sqlx::PgPool,
        organization_id: Uuid,
        id: Uuid,
        input: UpdateBinding,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut updates = vec!["updated_at = NOW()".to_string()];
        let mut param_idx = 3;

        if input.teacher_id.is_some() {
            updates.push(format!("teacher_id = ${param_idx}"));
            param_idx += 1;
        }
        if input.subject_id.is_some() {
            updates.push(format!("subject_id = ${param_idx}"));
            param_idx += 1;
        }
        if input.room_id.is_some() {
            updates.push(format!("room_id = ${param_idx}"));
            param_idx += 1;
        }
        if input.target.is_some() {
            updates.push(format!("class_id = ${param_idx}"));
            param_idx += 1;
            updates.push(format!("class_band_id = ${param_idx}"));
            param_idx += 1;
        }
        if input.periods_per_week.is_some() {
            updates.push(format!("periods_per_week = ${param_idx}"));
            param_idx += 1;
        }
        if input.is_fixed.is_some() {
            updates.push(format!("is_fixed = ${param_idx}"));
            param_idx += 1;
        }
        if input.priority.is_some() {
            updates.push(format!("priority = ${param_idx}"));
            param_idx += 1;
        }
        if input.status.is_some() {
            updates.push(format!("status = ${param_idx}"));
        }

        let query = format!(
            "UPDATE bindings SET {} WHERE id = $1 AND organization_id = $2 AND NOT is_deleted RETURNING *",
            updates.join(", ")
        );

        let mut q = sqlx::query_as::<_, Binding>(&query)
            .bind(id)
            .bind(organization_id);

        if let Some(teacher_id) = input.teacher_id {
            q = q.bind(teacher_id);
        }
        if let Some(subject_id) = input.subject_id {
            q = q.bind(subject_id);
        }
        if let Some(room_id) = input.room_id {
            q = q.bind(room_id);
        }
        if let Some(target) = input.target {
            let (class_id, class_band_id) = target.into_columns();
            q = q.bind(class_id).bind(class_band_id);
        }
        if let Some(periods_per_week) = input.periods_per_week {
            q = q.bind(periods_per_week);
        }
        if let Some(is_fixed) = input.is_fixed {
            q = q.bind(is_fixed);
        }
        if let Some(priority) = input.priority {
            q = q.bind(priority);
        }
        if let Some(status) = input.status {
            q = q.bind(status);
        }

        q.fetch_optional(pool).await
    }

    /// Soft-delete a binding. Returns false if it was already deleted or missing.
    pub async fn soft_delete(
        pool: &sqlx::PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE bindings
            SET is_deleted = true, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND organization_id = $2 AND NOT is_deleted
            ",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ids of the fixed bindings among `ids`, within an organization.
    ///
    /// Used by bulk operations to leave entries of fixed bindings alone.
    pub async fn fixed_ids<'e, E>(
        executor: E,
        organization_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r"
            SELECT id FROM bindings
            WHERE organization_id = $1 AND id = ANY($2) AND is_fixed
            ",
        )
        .bind(organization_id)
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// The class or class band this binding schedules.
    ///
    /// `None` only if the stored row violates the target CHECK constraint.
    #[must_use]
    pub fn scheduling_target(&self) -> Option<SchedulingTarget> {
        SchedulingTarget::from_columns(self.class_id, self.class_band_id)
    }
}

impl OrgScoped for Binding {
    fn organization_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.organization_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_binding() -> Binding {
        Binding {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            plan_settings_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            class_id: Some(Uuid::new_v4()),
            class_band_id: None,
            periods_per_week: 3,
            is_fixed: false,
            priority: 5,
            status: BindingStatus::Active,
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(BindingStatus::Active.to_string(), "active");
        assert_eq!(BindingStatus::Suspended.to_string(), "suspended");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "active".parse::<BindingStatus>().unwrap(),
            BindingStatus::Active
        );
        assert_eq!(
            "suspended".parse::<BindingStatus>().unwrap(),
            BindingStatus::Suspended
        );
        assert!("retired".parse::<BindingStatus>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BindingStatus::Suspended).unwrap();
        assert_eq!(json, "\"suspended\"");

        let parsed: BindingStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, BindingStatus::Active);
    }

    #[test]
    fn test_scheduling_target_class() {
        let binding = sample_binding();
        let target = binding.scheduling_target().unwrap();
        assert_eq!(target, SchedulingTarget::Class(binding.class_id.unwrap()));
        assert!(!target.is_class_band());
        assert_eq!(target.resource_id(), binding.class_id.unwrap());
    }

    #[test]
    fn test_scheduling_target_band() {
        let band_id = Uuid::new_v4();
        let binding = Binding {
            class_id: None,
            class_band_id: Some(band_id),
            ..sample_binding()
        };
        let target = binding.scheduling_target().unwrap();
        assert!(target.is_class_band());
        assert_eq!(target.resource_id(), band_id);
    }

    #[test]
    fn test_scheduling_target_rejects_invalid_pairs() {
        assert!(SchedulingTarget::from_columns(None, None).is_none());
        assert!(
            SchedulingTarget::from_columns(Some(Uuid::new_v4()), Some(Uuid::new_v4())).is_none()
        );
    }

    #[test]
    fn test_target_column_round_trip() {
        let class_id = Uuid::new_v4();
        let target = SchedulingTarget::Class(class_id);
        let (c, b) = target.into_columns();
        assert_eq!(c, Some(class_id));
        assert_eq!(b, None);
        assert_eq!(SchedulingTarget::from_columns(c, b), Some(target));
    }
}
