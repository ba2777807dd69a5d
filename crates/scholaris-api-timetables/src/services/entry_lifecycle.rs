//! Transactional entry lifecycle: place, remove, restore, bulk lock.
//!
//! Validation and commit share one transaction; the partial unique
//! indexes on the slot columns are the correctness backstop when two
//! writers validate against the same empty slot concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use scholaris_core::OrganizationId;
use scholaris_db::models::{Binding, CreateTimetableEntry, Timetable, TimetableEntry};
use scholaris_db::set_org_context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiResult, TimetablesError};
use crate::models::{
    BulkLockRequest, CreateEntryRequest, RestoreEntryRequest, ScheduleValidationResult,
};
use crate::services::conflict_detector::{ConflictDetector, ProposedPlacement};
use crate::services::schedule_validator::ScheduleValidator;

/// Partial unique indexes backing the slot invariant.
const SLOT_CONSTRAINTS: [&str; 4] = [
    "uq_entries_slot_teacher",
    "uq_entries_slot_room",
    "uq_entries_slot_class",
    "uq_entries_slot_class_band",
];

fn is_slot_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .constraint()
            .is_some_and(|name| SLOT_CONSTRAINTS.contains(&name)),
        _ => false,
    }
}

/// Service owning all entry mutations.
#[derive(Clone)]
pub struct EntryLifecycleManager {
    pool: PgPool,
    validator: Arc<ScheduleValidator>,
    detector: Arc<ConflictDetector>,
}

impl EntryLifecycleManager {
    /// Create a new lifecycle manager.
    pub fn new(
        pool: PgPool,
        validator: Arc<ScheduleValidator>,
        detector: Arc<ConflictDetector>,
    ) -> Self {
        Self {
            pool,
            validator,
            detector,
        }
    }

    /// Validate and commit a manual placement in one transaction.
    ///
    /// An invalid result rejects with the full result attached; a lost
    /// race against a concurrent writer is caught at the slot constraint
    /// and surfaced the same way.
    pub async fn create_manual_entry(
        &self,
        organization_id: Uuid,
        timetable_id: Uuid,
        request: &CreateEntryRequest,
    ) -> ApiResult<TimetableEntry> {
        let mut tx = self.pool.begin().await?;
        set_org_context(&mut *tx, OrganizationId::from_uuid(organization_id)).await?;

        let result = self
            .validator
            .validate_on(
                &mut tx,
                organization_id,
                timetable_id,
                request.binding_id,
                request.day_of_week,
                request.period,
            )
            .await?;
        if !result.valid {
            return Err(TimetablesError::ScheduleConflict(result));
        }

        let binding = Binding::find_by_id(&mut *tx, organization_id, request.binding_id)
            .await?
            .ok_or(TimetablesError::BindingNotFound(request.binding_id))?;

        let input = CreateTimetableEntry {
            organization_id,
            timetable_id,
            binding_id: binding.id,
            teacher_id: binding.teacher_id,
            subject_id: binding.subject_id,
            room_id: binding.room_id,
            class_id: binding.class_id,
            class_band_id: binding.class_band_id,
            day_of_week: request.day_of_week,
            period: request.period,
            is_draft: request.is_draft,
        };

        match TimetableEntry::insert(&mut *tx, input).await {
            Ok(entry) => {
                tx.commit().await?;
                tracing::info!(
                    entry_id = %entry.id,
                    timetable_id = %timetable_id,
                    binding_id = %entry.binding_id,
                    day_of_week = entry.day_of_week,
                    period = entry.period,
                    "Timetable entry created"
                );
                Ok(entry)
            }
            Err(err) if is_slot_collision(&err) => {
                // Lost the race; the aborted transaction cannot be used
                // for the explanatory re-scan.
                drop(tx);
                let placement = ProposedPlacement {
                    timetable_id,
                    binding_id: binding.id,
                    teacher_id: binding.teacher_id,
                    room_id: binding.room_id,
                    target: binding.scheduling_target().ok_or_else(|| {
                        TimetablesError::Validation(
                            "Binding has no scheduling target".to_string(),
                        )
                    })?,
                    day_of_week: request.day_of_week,
                    period: request.period,
                    exclude_entry_id: None,
                };
                Err(self.explain_lost_race(organization_id, placement, result).await)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Soft-delete an entry. The slot frees immediately; the row stays
    /// restorable.
    pub async fn remove_entry(&self, organization_id: Uuid, entry_id: Uuid) -> ApiResult<()> {
        let entry = TimetableEntry::find_by_id(&self.pool, organization_id, entry_id)
            .await?
            .filter(|entry| !entry.is_deleted)
            .ok_or(TimetablesError::EntryNotFound(entry_id))?;

        if !TimetableEntry::soft_delete(&self.pool, organization_id, entry_id).await? {
            return Err(TimetablesError::EntryNotFound(entry_id));
        }

        tracing::info!(
            entry_id = %entry.id,
            timetable_id = %entry.timetable_id,
            "Timetable entry removed"
        );
        Ok(())
    }

    /// Restore the most recently deleted entry at a slot, then return
    /// the slot's active entries.
    ///
    /// The slot may have been reused since the deletion, so the restore
    /// re-runs conflict detection (excluding the entry itself) and
    /// rejects if anything collides.
    pub async fn restore_entry(
        &self,
        organization_id: Uuid,
        timetable_id: Uuid,
        request: &RestoreEntryRequest,
    ) -> ApiResult<Vec<TimetableEntry>> {
        Timetable::find_by_id(&self.pool, organization_id, timetable_id)
            .await?
            .filter(|timetable| !timetable.is_deleted)
            .ok_or(TimetablesError::TimetableNotFound(timetable_id))?;

        let mut tx = self.pool.begin().await?;
        set_org_context(&mut *tx, OrganizationId::from_uuid(organization_id)).await?;

        let deleted = TimetableEntry::find_latest_deleted_at_slot(
            &mut *tx,
            timetable_id,
            request.day_of_week,
            request.period,
        )
        .await?
        .ok_or(TimetablesError::NoDeletedEntryAtSlot {
            day_of_week: request.day_of_week,
            period: request.period,
        })?;

        let placement = ProposedPlacement::from_entry(&deleted).ok_or_else(|| {
            TimetablesError::Validation("Entry has no scheduling target".to_string())
        })?;
        let conflicts = self
            .detector
            .detect_at_slot(&mut tx, organization_id, &placement)
            .await?;
        if !conflicts.is_empty() {
            return Err(TimetablesError::ScheduleConflict(ScheduleValidationResult {
                valid: false,
                timetable_id,
                binding_id: deleted.binding_id,
                day_of_week: request.day_of_week,
                period: request.period,
                conflicts,
                validation_errors: Vec::new(),
            }));
        }

        let restored = match TimetableEntry::restore(&mut *tx, deleted.id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                // Restored concurrently; from this caller's view there is
                // no deleted entry left at the slot.
                return Err(TimetablesError::NoDeletedEntryAtSlot {
                    day_of_week: request.day_of_week,
                    period: request.period,
                });
            }
            Err(err) if is_slot_collision(&err) => {
                drop(tx);
                let base = ScheduleValidationResult {
                    valid: false,
                    timetable_id,
                    binding_id: deleted.binding_id,
                    day_of_week: request.day_of_week,
                    period: request.period,
                    conflicts: Vec::new(),
                    validation_errors: Vec::new(),
                };
                return Err(self.explain_lost_race(organization_id, placement, base).await);
            }
            Err(err) => return Err(err.into()),
        };
        tx.commit().await?;

        tracing::info!(
            entry_id = %restored.id,
            timetable_id = %timetable_id,
            day_of_week = request.day_of_week,
            period = request.period,
            "Timetable entry restored"
        );

        let entries = TimetableEntry::list_active_at_slot(
            &self.pool,
            timetable_id,
            request.day_of_week,
            request.period,
        )
        .await?;
        Ok(entries)
    }

    /// Lock or unlock a set of entries, all-or-nothing.
    ///
    /// Every id must name a non-deleted entry of the timetable. Entries
    /// of fixed bindings are treated as always locked: an unlock request
    /// leaves them untouched while the rest of the batch proceeds.
    pub async fn bulk_update_lock_status(
        &self,
        organization_id: Uuid,
        timetable_id: Uuid,
        request: &BulkLockRequest,
    ) -> ApiResult<Vec<TimetableEntry>> {
        Timetable::find_by_id(&self.pool, organization_id, timetable_id)
            .await?
            .filter(|timetable| !timetable.is_deleted)
            .ok_or(TimetablesError::TimetableNotFound(timetable_id))?;

        let mut ids: Vec<Uuid> = request.entry_ids.clone();
        ids.sort_unstable();
        ids.dedup();

        let mut tx = self.pool.begin().await?;
        set_org_context(&mut *tx, OrganizationId::from_uuid(organization_id)).await?;

        let entries = TimetableEntry::find_active_by_ids(&mut *tx, timetable_id, &ids).await?;
        if entries.len() != ids.len() {
            let found: HashSet<Uuid> = entries.iter().map(|entry| entry.id).collect();
            let missing: Vec<Uuid> = ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();
            return Err(TimetablesError::EntriesNotFound(missing));
        }

        if request.is_locked {
            TimetableEntry::set_lock_status(&mut *tx, timetable_id, &ids, true).await?;
        } else {
            let binding_ids: Vec<Uuid> = entries
                .iter()
                .map(|entry| entry.binding_id)
                .collect::<HashSet<Uuid>>()
                .into_iter()
                .collect();
            let fixed: HashSet<Uuid> =
                Binding::fixed_ids(&mut *tx, organization_id, &binding_ids)
                    .await?
                    .into_iter()
                    .collect();

            let unlockable: Vec<Uuid> = entries
                .iter()
                .filter(|entry| !fixed.contains(&entry.binding_id))
                .map(|entry| entry.id)
                .collect();
            if !unlockable.is_empty() {
                TimetableEntry::set_lock_status(&mut *tx, timetable_id, &unlockable, false)
                    .await?;
            }
        }

        let updated = TimetableEntry::find_active_by_ids(&mut *tx, timetable_id, &ids).await?;
        tx.commit().await?;

        tracing::info!(
            timetable_id = %timetable_id,
            count = ids.len(),
            is_locked = request.is_locked,
            "Entry lock status updated"
        );
        Ok(updated)
    }

    /// Re-scan after a lost commit race and surface the collision in the
    /// usual conflict vocabulary.
    async fn explain_lost_race(
        &self,
        organization_id: Uuid,
        placement: ProposedPlacement,
        mut result: ScheduleValidationResult,
    ) -> TimetablesError {
        match self
            .detector
            .detect_for_proposal(organization_id, &placement)
            .await
        {
            Ok(conflicts) if !conflicts.is_empty() => {
                result.conflicts = conflicts;
            }
            Ok(_) => {
                // The winning entry may already be gone again; report
                // the race itself.
                result
                    .validation_errors
                    .push("The slot was taken by a concurrent update".to_string());
            }
            Err(err) => {
                tracing::error!(error = %err, "Conflict re-scan after lost race failed");
                result
                    .validation_errors
                    .push("The slot was taken by a concurrent update".to_string());
            }
        }
        result.valid = false;
        TimetablesError::ScheduleConflict(result)
    }
}
