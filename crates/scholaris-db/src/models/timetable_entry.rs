//! Timetable entry model.
//!
//! An entry places one binding at one (day_of_week, period) slot inside a
//! timetable. Resource fields are denormalized from the binding at commit
//! time so slot scans never join back to bindings. Four partial unique
//! indexes (`uq_entries_slot_teacher`, `uq_entries_slot_room`,
//! `uq_entries_slot_class`, `uq_entries_slot_class_band`) back the
//! no-double-booking invariant against concurrent writers.

use chrono::{DateTime, Utc};
use scholaris_core::{OrgScoped, OrganizationId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use super::binding::SchedulingTarget;

/// Lifecycle state of an entry, derived from the soft-delete flag.
///
/// `is_locked` is an orthogonal flag layered on active entries, not a
/// separate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Active,
    Deleted,
}

/// A placement of one binding at one slot.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Unique identifier.
    pub id: Uuid,

    /// Denormalized from the owning timetable.
    pub organization_id: Uuid,

    /// The timetable this entry belongs to.
    pub timetable_id: Uuid,

    /// The binding this entry places.
    pub binding_id: Uuid,

    /// Teacher at this slot (copied from the binding at commit time).
    pub teacher_id: Uuid,

    /// Subject at this slot (copied from the binding at commit time).
    pub subject_id: Uuid,

    /// Room at this slot (copied from the binding at commit time).
    pub room_id: Uuid,

    /// Targeted class; mutually exclusive with `class_band_id`.
    pub class_id: Option<Uuid>,

    /// Targeted class band; mutually exclusive with `class_id`.
    pub class_band_id: Option<Uuid>,

    /// Day of week (1-based, bounded by the plan's days per week).
    pub day_of_week: i32,

    /// Period number within the day (1-based).
    pub period: i32,

    /// Locked entries are excluded from bulk mutation.
    pub is_locked: bool,

    /// Draft entries are trial placements; they still occupy their slot.
    pub is_draft: bool,

    /// Soft-delete flag.
    pub is_deleted: bool,

    /// When the entry was soft-deleted; drives most-recent-first restore.
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting an entry. Built by the lifecycle service after
/// validation, never directly from the wire.
#[derive(Debug, Clone)]
pub struct CreateTimetableEntry {
    pub organization_id: Uuid,
    pub timetable_id: Uuid,
    pub binding_id: Uuid,
    pub teacher_id: Uuid,
    pub subject_id: Uuid,
    pub room_id: Uuid,
    pub class_id: Option<Uuid>,
    pub class_band_id: Option<Uuid>,
    pub day_of_week: i32,
    pub period: i32,
    pub is_draft: bool,
}

impl TimetableEntry {
    /// Insert a validated entry.
    ///
    /// Runs inside the placement transaction; a concurrent writer that won
    /// the slot rejects here with one of the `uq_entries_slot_*` constraints.
    pub async fn insert<'e, E>(
        executor: E,
        input: CreateTimetableEntry,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            INSERT INTO timetable_entries (
                organization_id, timetable_id, binding_id, teacher_id, subject_id, room_id,
                class_id, class_band_id, day_of_week, period, is_draft
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            ",
        )
        .bind(input.organization_id)
        .bind(input.timetable_id)
        .bind(input.binding_id)
        .bind(input.teacher_id)
        .bind(input.subject_id)
        .bind(input.room_id)
        .bind(input.class_id)
        .bind(input.class_band_id)
        .bind(input.day_of_week)
        .bind(input.period)
        .bind(input.is_draft)
        .fetch_one(executor)
        .await
    }

    /// Find an entry by ID within an organization, deleted or not.
    pub async fn find_by_id(
        pool: &sqlx::PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM timetable_entries
            WHERE id = $1 AND organization_id = $2
            ",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
    }

    /// All non-deleted entries occupying one slot of a timetable.
    ///
    /// This is the narrow lookup the conflict scan runs against.
    pub async fn list_active_at_slot<'e, E>(
        executor: E,
        timetable_id: Uuid,
        day_of_week: i32,
        period: i32,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            SELECT * FROM timetable_entries
            WHERE timetable_id = $1 AND day_of_week = $2 AND period = $3 AND NOT is_deleted
            ORDER BY created_at ASC
            ",
        )
        .bind(timetable_id)
        .bind(day_of_week)
        .bind(period)
        .fetch_all(executor)
        .await
    }

    /// Non-deleted entries of a timetable, optionally narrowed to a day
    /// and/or period, ordered by slot.
    pub async fn list_active(
        pool: &sqlx::PgPool,
        timetable_id: Uuid,
        day_of_week: Option<i32>,
        period: Option<i32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            r"
            SELECT * FROM timetable_entries
            WHERE timetable_id = $1 AND NOT is_deleted
            ",
        );
        let mut param_count = 1;

        if day_of_week.is_some() {
            param_count += 1;
            query.push_str(&format!(" AND day_of_week = ${param_count}"));
        }
        if period.is_some() {
            param_count += 1;
            query.push_str(&format!(" AND period = ${param_count}"));
        }

        query.push_str(" ORDER BY day_of_week ASC, period ASC, created_at ASC");

        let mut q = sqlx::query_as::<_, TimetableEntry>(&query).bind(timetable_id);

        if let Some(day) = day_of_week {
            q = q.bind(day);
        }
        if let Some(period) = period {
            q = q.bind(period);
        }

        q.fetch_all(pool).await
    }

    /// Count non-deleted entries referencing a binding, across all
    /// timetables that are themselves not deleted.
    pub async fn count_active_for_binding<'e, E>(
        executor: E,
        binding_id: Uuid,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM timetable_entries e
            JOIN timetables t ON t.id = e.timetable_id
            WHERE e.binding_id = $1 AND NOT e.is_deleted AND NOT t.is_deleted
            ",
        )
        .bind(binding_id)
        .fetch_one(executor)
        .await
    }

    /// Soft-delete an entry. Returns false if it was already deleted or
    /// missing.
    pub async fn soft_delete<'e, E>(
        executor: E,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r"
            UPDATE timetable_entries
            SET is_deleted = true, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND organization_id = $2 AND NOT is_deleted
            ",
        )
        .bind(id)
        .bind(organization_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The most recently soft-deleted entry at a slot, if any.
    pub async fn find_latest_deleted_at_slot<'e, E>(
        executor: E,
        timetable_id: Uuid,
        day_of_week: i32,
        period: i32,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            SELECT * FROM timetable_entries
            WHERE timetable_id = $1 AND day_of_week = $2 AND period = $3 AND is_deleted
            ORDER BY deleted_at DESC NULLS LAST
            LIMIT 1
            ",
        )
        .bind(timetable_id)
        .bind(day_of_week)
        .bind(period)
        .fetch_optional(executor)
        .await
    }

    /// Un-delete an entry. Returns `None` if it is not currently deleted.
    pub async fn restore<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            UPDATE timetable_entries
            SET is_deleted = false, deleted_at = NULL, updated_at = NOW()
            WHERE id = $1 AND is_deleted
            RETURNING *
            ",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Non-deleted entries of a timetable matching the given ids.
    ///
    /// Used by bulk lock updates to verify every named entry is present
    /// before mutating any of them.
    pub async fn find_active_by_ids<'e, E>(
        executor: E,
        timetable_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            SELECT * FROM timetable_entries
            WHERE timetable_id = $1 AND id = ANY($2) AND NOT is_deleted
            ORDER BY day_of_week ASC, period ASC, created_at ASC
            ",
        )
        .bind(timetable_id)
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// Set the lock flag uniformly on the given entries. Returns the
    /// number of rows changed.
    pub async fn set_lock_status<'e, E>(
        executor: E,
        timetable_id: Uuid,
        ids: &[Uuid],
        is_locked: bool,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r"
            UPDATE timetable_entries
            SET is_locked = $3, updated_at = NOW()
            WHERE timetable_id = $1 AND id = ANY($2) AND NOT is_deleted
            ",
        )
        .bind(timetable_id)
        .bind(ids)
        .bind(is_locked)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Derived lifecycle state.
    #[must_use]
    pub fn state(&self) -> EntryState {
        if self.is_deleted {
            EntryState::Deleted
        } else {
            EntryState::Active
        }
    }

    /// The class or class band this entry occupies the slot for.
    #[must_use]
    pub fn scheduling_target(&self) -> Option<SchedulingTarget> {
        SchedulingTarget::from_columns(self.class_id, self.class_band_id)
    }

    /// Whether this entry targets a class band.
    #[must_use]
    pub fn is_class_band_entry(&self) -> bool {
        self.class_band_id.is_some()
    }
}

impl OrgScoped for TimetableEntry {
    fn organization_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.organization_id)
    }
}
