//! Binding CRUD and lifecycle.

use scholaris_db::models::{Binding, ClassBand, CreateBinding, PlanSettings, SchedulingTarget};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiResult, TimetablesError};
use crate::models::{CreateBindingRequest, UpdateBindingRequest};

/// Service owning binding mutations and lookups.
#[derive(Clone)]
pub struct BindingService {
    pool: PgPool,
}

impl BindingService {
    /// Create a new binding service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a binding.
    ///
    /// The referenced plan settings must exist in the organization, and
    /// a band target must name a band of the same organization; foreign
    /// keys alone do not enforce the org match.
    pub async fn create(
        &self,
        organization_id: Uuid,
        request: CreateBindingRequest,
    ) -> ApiResult<Binding> {
        PlanSettings::find_by_id(&self.pool, organization_id, request.plan_settings_id)
            .await?
            .ok_or_else(|| {
                TimetablesError::Validation(format!(
                    "Plan settings not found: {}",
                    request.plan_settings_id
                ))
            })?;

        if let Some(SchedulingTarget::ClassBand(band_id)) = request.target() {
            self.require_band(organization_id, band_id).await?;
        }

        let binding = Binding::create(
            &self.pool,
            CreateBinding {
                organization_id,
                plan_settings_id: request.plan_settings_id,
                teacher_id: request.teacher_id,
                subject_id: request.subject_id,
                room_id: request.room_id,
                class_id: request.class_id,
                class_band_id: request.class_band_id,
                periods_per_week: request.periods_per_week,
                is_fixed: request.is_fixed,
                priority: request.priority,
            },
        )
        .await?;

        tracing::info!(
            binding_id = %binding.id,
            plan_settings_id = %binding.plan_settings_id,
            periods_per_week = binding.periods_per_week,
            "Binding created"
        );
        Ok(binding)
    }

    /// Fetch a binding. Soft-deleted bindings read as absent.
    pub async fn get(&self, organization_id: Uuid, id: Uuid) -> ApiResult<Binding> {
        Binding::find_by_id(&self.pool, organization_id, id)
            .await?
            .filter(|binding| !binding.is_deleted)
            .ok_or(TimetablesError::BindingNotFound(id))
    }

    /// Partially update a binding.
    pub async fn update(
        &self,
        organization_id: Uuid,
        id: Uuid,
        request: UpdateBindingRequest,
    ) -> ApiResult<Binding> {
        if let Some(SchedulingTarget::ClassBand(band_id)) = request.target() {
            self.require_band(organization_id, band_id).await?;
        }

        let binding = Binding::update(&self.pool, organization_id, id, request.into_update())
            .await?
            .ok_or(TimetablesError::BindingNotFound(id))?;

        tracing::info!(binding_id = %binding.id, "Binding updated");
        Ok(binding)
    }

    /// Soft-delete a binding. Existing entries stand; new placements are
    /// rejected from now on.
    pub async fn delete(&self, organization_id: Uuid, id: Uuid) -> ApiResult<()> {
        if !Binding::soft_delete(&self.pool, organization_id, id).await? {
            return Err(TimetablesError::BindingNotFound(id));
        }
        tracing::info!(binding_id = %id, "Binding deleted");
        Ok(())
    }

    async fn require_band(&self, organization_id: Uuid, band_id: Uuid) -> ApiResult<()> {
        ClassBand::find_by_id(&self.pool, organization_id, band_id)
            .await?
            .ok_or_else(|| {
                TimetablesError::Validation(format!("Class band not found: {band_id}"))
            })?;
        Ok(())
    }
}
