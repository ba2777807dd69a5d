//! Timetable model.
//!
//! A timetable is the scheduled container for one organization, planning
//! configuration, academic year and semester. The scope is unique among
//! non-deleted rows (`uq_timetables_scope`).

use chrono::{DateTime, Utc};
use scholaris_core::{OrgScoped, OrganizationId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Publication status of a timetable. Informational; the placement engine
/// does not gate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimetableStatus {
    Draft,
    Published,
    Archived,
}

impl fmt::Display for TimetableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableStatus::Draft => write!(f, "draft"),
            TimetableStatus::Published => write!(f, "published"),
            TimetableStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for TimetableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TimetableStatus::Draft),
            "published" => Ok(TimetableStatus::Published),
            "archived" => Ok(TimetableStatus::Archived),
            _ => Err(format!("Unknown timetable status: {s}")),
        }
    }
}

/// A scheduled timetable.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Timetable {
    /// Unique identifier.
    pub id: Uuid,

    /// The organization this timetable belongs to.
    pub organization_id: Uuid,

    /// The planning configuration this timetable belongs to.
    pub plan_settings_id: Uuid,

    /// Academic year label, e.g. "2026/27".
    pub academic_year: String,

    /// Semester number within the academic year (1-based).
    pub semester: i32,

    /// Display name.
    pub name: String,

    /// Publication status.
    pub status: TimetableStatus,

    /// Soft-delete flag. A deleted timetable voids its entries for conflict
    /// and quota purposes.
    pub is_deleted: bool,

    /// When the timetable was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,

    /// When the timetable was created.
    pub created_at: DateTime<Utc>,

    /// When the timetable was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimetable {
    pub organization_id: Uuid,
    pub plan_settings_id: Uuid,
    pub academic_year: String,
    pub semester: i32,
    pub name: String,
    pub status: Option<TimetableStatus>,
}

impl Timetable {
    /// Find a timetable by ID within an organization.
    ///
    /// Returns soft-deleted rows too; callers decide how a deleted
    /// timetable is reported.
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
            SELECT * FROM timetables
            WHERE id = $1 AND organization_id = $2
            ",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await
    }

    /// Create a new timetable.
    ///
    /// A duplicate (organization, plan settings, academic year, semester)
    /// scope rejects at `uq_timetables_scope`; the caller translates that
    /// constraint violation.
    pub async fn create(pool: &sqlx::PgPool, input: CreateTimetable) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO timetables (
                organization_id, plan_settings_id, academic_year, semester, name, status
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'draft'))
            RETURNING *
            ",
        )
        .bind(input.organization_id)
        .bind(input.plan_settings_id)
        .bind(&input.academic_year)
        .bind(input.semester)
        .bind(&input.name)
        .bind(input.status.map(|s| s.to_string()))
        .fetch_one(pool)
        .await
    }

    /// Soft-delete a timetable. Returns false if it was already deleted or
    /// missing.
    pub async fn soft_delete(
        pool: &sqlx::PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE timetables
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
}

impl OrgScoped for Timetable {
    fn organization_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.organization_id)
    }
}
