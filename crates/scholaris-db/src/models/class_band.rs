//! Class band model.
//!
//! A class band groups classes that are scheduled together as one unit.
//! Membership rows feed the band-vs-class cross check in conflict detection.

use chrono::{DateTime, Utc};
use scholaris_core::{OrgScoped, OrganizationId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A group of classes scheduled as a single unit.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClassBand {
    /// Unique identifier.
    pub id: Uuid,

    /// The organization this band belongs to.
    pub organization_id: Uuid,

    /// Display name, e.g. "Year 9 languages".
    pub name: String,

    /// When the band was created.
    pub created_at: DateTime<Utc>,

    /// When the band was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One class's membership in a class band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ClassBandMembership {
    pub class_band_id: Uuid,
    pub class_id: Uuid,
}

impl ClassBand {
    /// Find a band by ID within an organization.
    pub async fn find_by_id(
        pool: &sqlx::PgPool,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM class_bands
            WHERE id = $1 AND organization_id = $2
            ",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
    }
}

impl ClassBandMembership {
    /// Load every membership row touching any of the given classes or bands.
    ///
    /// One round trip covers both directions of the cross check: bands that
    /// contain a proposed class, and classes inside a proposed band.
    pub async fn load_touching<'e, E>(
        executor: E,
        organization_id: Uuid,
        class_ids: &[Uuid],
        band_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r"
            SELECT class_band_id, class_id FROM class_band_classes
            WHERE organization_id = $1
              AND (class_id = ANY($2) OR class_band_id = ANY($3))
            ",
        )
        .bind(organization_id)
        .bind(class_ids)
        .bind(band_ids)
        .fetch_all(executor)
        .await
    }
}

impl OrgScoped for ClassBand {
    fn organization_id(&self) -> OrganizationId {
        OrganizationId::from_uuid(self.organization_id)
    }
}
