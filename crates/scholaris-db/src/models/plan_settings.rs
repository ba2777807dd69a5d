//! Plan settings model.
//!
//! Defines the weekly grid shape (days per week, periods per day) for one
//! planning run. The placement engine reads this to bound day-of-week input.

use chrono::{DateTime, Utc};
use scholaris_core::{OrgScoped, OrganizationId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// One organization's planning configuration.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Unique identifier.
    pub id: Uuid,

    /// The organization this configuration belongs to.
    pub organization_id: Uuid,

    /// Display name, e.g. "2026/27 main plan".
    pub name: String,

    /// Number of teaching days per week (1..=7).
    pub days_per_week: i32,

    /// Number of periods in a teaching day.
    pub periods_per_day: i32,

    /// When the configuration was created.
    pub created_at: DateTime<Utc>,

    /// When the configuration was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating plan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanSettings {
    pub organization_id: Uuid,
    pub name: String,
    pub days_per_week: Option<i32>,
    pub periods_per_day: Option<i32>,
}

impl PlanSettings {
    /// Find plan settings by ID within an organization.
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
            SELECT * FROM plan_settings
            WHERE id = $1 AND organization_id = $2
            ",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await
    }

    /// Create new plan settings.
    pub async fn create(
        pool: &sqlx::PgPool,
        input: CreatePlanSettings,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO plan_settings (organization_id, name, days_per_week, periods_per_day)
            VALUES ($1, $2, COALESCE($3, 5), COALESCE($4, 10))
            RETURNING *
            ",
        )
        .bind(input.organization_id)
        .bind(&input.name)
        .bind(input.days_per_week)
        .bind(input.periods_per_day)
        .fetch_one(pool)
        .await
    }

    /// Whether a day-of-week value falls inside this plan's teaching week.
    #[must_use]
    pub fn contains_day(&self, day_of_week: i32) -> bool {
        day_of_week >= 1 && day_of_week <= self.days_per_week
    }
}

impl OrgScoped for PlanSettings {
    fn organization_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.organization_id)
    }
}
