//! Period model.
//!
//! Organization-scoped period configuration: maps a period number to a named
//! wall-clock span. Entries reference periods by number, never by raw time.

use chrono::{DateTime, NaiveTime, Utc};
use scholaris_core::{OrgScoped, OrganizationId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A configured teaching period.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier.
    pub id: Uuid,

    /// The organization this period belongs to.
    pub organization_id: Uuid,

    /// The planning configuration this period belongs to.
    pub plan_settings_id: Uuid,

    /// Position within the day (1-based).
    pub period_number: i32,

    /// Display name, e.g. "1st period".
    pub name: String,

    /// Start of the period.
    pub start_time: NaiveTime,

    /// End of the period.
    pub end_time: NaiveTime,

    /// When the period was created.
    pub created_at: DateTime<Utc>,

    /// When the period was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePeriod {
    pub organization_id: Uuid,
    pub plan_settings_id: Uuid,
    pub period_number: i32,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Period {
    /// Find a period by its number within a planning configuration.
    pub async fn find_by_number<'e, E>(
        executor: E,
        organization_id: Uuid,
        plan_settings_id: Uuid,
        period_number: i32,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            SELECT * FROM periods
            WHERE organization_id = $1 AND plan_settings_id = $2 AND period_number = $3
            ",
        )
        .bind(organization_id)
        .bind(plan_settings_id)
        .bind(period_number)
        .fetch_optional(executor)
        .await
    }

    /// Create a new period.
    pub async fn create(pool: &sqlx::PgPool, input: CreatePeriod) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO periods (
                organization_id, plan_settings_id, period_number, name, start_time, end_time
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(input.organization_id)
        .bind(input.plan_settings_id)
        .bind(input.period_number)
        .bind(&input.name)
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_one(pool)
        .await
    }
}

impl OrgScoped for Period {
    fn organization_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.organization_id)
    }
}
