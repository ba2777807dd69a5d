//! Placement validation orchestration.
//!
//! Business problems are returned as data inside the result, never as
//! errors: the caller decides whether an invalid result is a 200 (the
//! validate endpoint) or a 409 (the committing endpoints).

use std::sync::Arc;

use scholaris_db::models::{Binding, BindingStatus, Period, PlanSettings, Timetable};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{ScheduleValidationResult, ValidateEntryRequest};
use crate::services::conflict_detector::{ConflictDetector, ProposedPlacement};
use crate::services::quota_tracker::QuotaTracker;

/// Runs the full pre-placement check for one proposed slot.
#[derive(Clone)]
pub struct ScheduleValidator {
    pool: PgPool,
    detector: Arc<ConflictDetector>,
    quota: Arc<QuotaTracker>,
}

impl ScheduleValidator {
    /// Create a new validator.
    pub fn new(pool: PgPool, detector: Arc<ConflictDetector>, quota: Arc<QuotaTracker>) -> Self {
        Self {
            pool,
            detector,
            quota,
        }
    }

    /// Validate a placement without committing anything.
    pub async fn validate(
        &self,
        organization_id: Uuid,
        timetable_id: Uuid,
        request: &ValidateEntryRequest,
    ) -> ApiResult<ScheduleValidationResult> {
        let mut conn = self.pool.acquire().await?;
        self.validate_on(
            &mut conn,
            organization_id,
            timetable_id,
            request.binding_id,
            request.day_of_week,
            request.period,
        )
        .await
    }

    /// Validate through the given connection.
    ///
    /// The committing path runs this inside its own transaction so the
    /// checks and the insert see one snapshot.
    ///
    /// Steps short-circuit only when the timetable or binding cannot be
    /// resolved; every other problem is appended and checking continues,
    /// so the caller sees all issues at once.
    pub async fn validate_on(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        timetable_id: Uuid,
        binding_id: Uuid,
        day_of_week: i32,
        period: i32,
    ) -> ApiResult<ScheduleValidationResult> {
        let mut result = ScheduleValidationResult {
            valid: false,
            timetable_id,
            binding_id,
            day_of_week,
            period,
            conflicts: Vec::new(),
            validation_errors: Vec::new(),
        };

        let timetable = match Timetable::find_by_id(&mut *conn, organization_id, timetable_id)
            .await?
        {
            Some(timetable) if !timetable.is_deleted => Some(timetable),
            _ => {
                result
                    .validation_errors
                    .push("Timetable not found".to_string());
                None
            }
        };

        let binding = match Binding::find_by_id(&mut *conn, organization_id, binding_id).await? {
            Some(binding) if !binding.is_deleted => Some(binding),
            _ => {
                result
                    .validation_errors
                    .push("Binding not found".to_string());
                None
            }
        };

        let (Some(timetable), Some(binding)) = (timetable, binding) else {
            return Ok(result);
        };

        if binding.status != BindingStatus::Active {
            result
                .validation_errors
                .push("Binding is not active".to_string());
        }

        if binding.plan_settings_id != timetable.plan_settings_id {
            result.validation_errors.push(
                "Binding does not belong to the timetable's plan settings".to_string(),
            );
        }

        match PlanSettings::find_by_id(&mut *conn, organization_id, timetable.plan_settings_id)
            .await?
        {
            Some(plan) => {
                if !plan.contains_day(day_of_week) {
                    result.validation_errors.push(format!(
                        "Day {day_of_week} is outside the plan week (1-{})",
                        plan.days_per_week
                    ));
                }
            }
            None => {
                result
                    .validation_errors
                    .push("Plan settings not found".to_string());
            }
        }

        if Period::find_by_number(
            &mut *conn,
            organization_id,
            timetable.plan_settings_id,
            period,
        )
        .await?
        .is_none()
        {
            result
                .validation_errors
                .push(format!("Period {period} not found"));
        }

        let summary = self.quota.summary_on(&mut *conn, &binding).await?;
        if !summary.has_remaining() {
            result.validation_errors.push(format!(
                "Binding has no remaining weekly quota ({} of {} periods scheduled)",
                summary.scheduled_periods, summary.total_periods
            ));
        }

        match binding.scheduling_target() {
            Some(target) => {
                let placement = ProposedPlacement {
                    timetable_id,
                    binding_id,
                    teacher_id: binding.teacher_id,
                    room_id: binding.room_id,
                    target,
                    day_of_week,
                    period,
                    exclude_entry_id: None,
                };
                result.conflicts = self
                    .detector
                    .detect_at_slot(&mut *conn, organization_id, &placement)
                    .await?;
            }
            None => {
                result
                    .validation_errors
                    .push("Binding has no scheduling target".to_string());
            }
        }

        result.valid = result.conflicts.is_empty() && result.validation_errors.is_empty();
        Ok(result)
    }
}
