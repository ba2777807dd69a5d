//! Timetable CRUD and the entries grid view.

use scholaris_db::models::{CreateTimetable, Timetable, TimetableEntry};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiResult, TimetablesError};
use crate::models::{CreateTimetableRequest, EntryListQuery};

fn is_scope_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.constraint() == Some("uq_timetables_scope")
        }
        _ => false,
    }
}

/// Service owning timetable mutations and lookups.
#[derive(Clone)]
pub struct TimetableService {
    pool: PgPool,
}

impl TimetableService {
    /// Create a new timetable service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a timetable.
    ///
    /// One live timetable per (plan settings, academic year, semester)
    /// scope; a duplicate rejects at `uq_timetables_scope`.
    pub async fn create(
        &self,
        organization_id: Uuid,
        request: CreateTimetableRequest,
    ) -> ApiResult<Timetable> {
        scholaris_db::models::PlanSettings::find_by_id(
            &self.pool,
            organization_id,
            request.plan_settings_id,
        )
        .await?
        .ok_or_else(|| {
            TimetablesError::Validation(format!(
                "Plan settings not found: {}",
                request.plan_settings_id
            ))
        })?;

        let timetable = Timetable::create(
            &self.pool,
            CreateTimetable {
                organization_id,
                plan_settings_id: request.plan_settings_id,
                academic_year: request.academic_year,
                semester: request.semester,
                name: request.name,
                status: request.status,
            },
        )
        .await
        .map_err(|err| {
            if is_scope_conflict(&err) {
                TimetablesError::Conflict(
                    "A timetable for this plan, academic year and semester already exists"
                        .to_string(),
                )
            } else {
                err.into()
            }
        })?;

        tracing::info!(
            timetable_id = %timetable.id,
            academic_year = %timetable.academic_year,
            semester = timetable.semester,
            "Timetable created"
        );
        Ok(timetable)
    }

    /// Fetch a timetable. Soft-deleted timetables read as absent.
    pub async fn get(&self, organization_id: Uuid, id: Uuid) -> ApiResult<Timetable> {
        Timetable::find_by_id(&self.pool, organization_id, id)
            .await?
            .filter(|timetable| !timetable.is_deleted)
            .ok_or(TimetablesError::TimetableNotFound(id))
    }

    /// Soft-delete a timetable. Its entries stop counting against quotas.
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> ApiResult<()> {
        if !Timetable::soft_delete(&self.pool, organization_id, id).await? {
            return Err(TimetablesError::TimetableNotFound(id));
        }
        tracing::info!(timetable_id = %id, "Timetable deleted");
        Ok(())
    }

    /// Active entries of a timetable, optionally narrowed to one day or
    /// period, ordered by (day, period, created_at).
    pub async fn list_entries(
        &self,
        organization_id: Uuid,
        timetable_id: Uuid,
        query: &EntryListQuery,
    ) -> ApiResult<Vec<TimetableEntry>> {
        self.get(organization_id, timetable_id).await?;
        let entries = TimetableEntry::list_active(
            &self.pool,
            timetable_id,
            query.day_of_week,
            query.period,
        )
        .await?;
        Ok(entries)
    }
}
