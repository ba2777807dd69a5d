//! Weekly quota accounting for bindings.

use scholaris_db::models::{Binding, TimetableEntry};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::SchedulingSummaryResponse;

/// Scheduled-versus-quota snapshot for one binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingSummary {
    pub binding_id: Uuid,
    pub total_periods: i64,
    pub scheduled_periods: i64,
    pub remaining_periods: i64,
    pub is_overscheduled: bool,
}

impl SchedulingSummary {
    /// Whether a new placement still fits within the quota.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.remaining_periods > 0
    }
}

impl From<SchedulingSummary> for SchedulingSummaryResponse {
    fn from(summary: SchedulingSummary) -> Self {
        Self {
            binding_id: summary.binding_id,
            total_periods: summary.total_periods,
            scheduled_periods: summary.scheduled_periods,
            remaining_periods: summary.remaining_periods,
            is_overscheduled: summary.is_overscheduled,
        }
    }
}

/// Compute the summary from a quota and a scheduled count.
///
/// Overscheduling is reported, never clamped: a quota lowered below the
/// already-scheduled count must stay visible as `is_overscheduled`.
/// Remaining periods saturate at zero.
#[must_use]
pub fn summarize(
    binding_id: Uuid,
    periods_per_week: i32,
    scheduled_periods: i64,
) -> SchedulingSummary {
    let total_periods = i64::from(periods_per_week);
    SchedulingSummary {
        binding_id,
        total_periods,
        scheduled_periods,
        remaining_periods: (total_periods - scheduled_periods).max(0),
        is_overscheduled: scheduled_periods > total_periods,
    }
}

/// Service counting scheduled periods per binding.
#[derive(Clone)]
pub struct QuotaTracker {
    pool: PgPool,
}

impl QuotaTracker {
    /// Create a new quota tracker.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Summary computed through the given connection, so validation
    /// inside a commit transaction counts against its own snapshot.
    pub async fn summary_on(
        &self,
        conn: &mut PgConnection,
        binding: &Binding,
    ) -> ApiResult<SchedulingSummary> {
        let scheduled = TimetableEntry::count_active_for_binding(&mut *conn, binding.id).await?;
        Ok(summarize(binding.id, binding.periods_per_week, scheduled))
    }

    /// Summary for the standalone reporting endpoint.
    pub async fn summary_for(&self, binding: &Binding) -> ApiResult<SchedulingSummary> {
        let scheduled = TimetableEntry::count_active_for_binding(&self.pool, binding.id).await?;
        Ok(summarize(binding.id, binding.periods_per_week, scheduled))
    }
}
