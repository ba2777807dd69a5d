//! Slot conflict detection.
//!
//! The scan itself is a pure function over already-loaded rows; the
//! service wraps it with the two narrow lookups it needs (active entries
//! at the slot, band memberships touching the involved classes and bands).

use std::collections::{BTreeMap, HashMap, HashSet};

use scholaris_db::models::{ClassBandMembership, SchedulingTarget, TimetableEntry};
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{ConflictType, ScheduleConflict};

/// A placement to probe: the slot plus the resources the binding would
/// occupy there.
#[derive(Debug, Clone)]
pub struct ProposedPlacement {
    pub timetable_id: Uuid,
    pub binding_id: Uuid,
    pub teacher_id: Uuid,
    pub room_id: Uuid,
    pub target: SchedulingTarget,
    pub day_of_week: i32,
    pub period: i32,
    /// Entry to ignore during the scan, for restores and re-validation
    /// of an entry being moved.
    pub exclude_entry_id: Option<Uuid>,
}

impl ProposedPlacement {
    /// Probe re-occupying an existing entry's slot with its own
    /// resources, excluding the entry itself.
    ///
    /// `None` if the entry row carries no scheduling target.
    #[must_use]
    pub fn from_entry(entry: &TimetableEntry) -> Option<Self> {
        Some(Self {
            timetable_id: entry.timetable_id,
            binding_id: entry.binding_id,
            teacher_id: entry.teacher_id,
            room_id: entry.room_id,
            target: entry.scheduling_target()?,
            day_of_week: entry.day_of_week,
            period: entry.period,
            exclude_entry_id: Some(entry.id),
        })
    }
}

/// Class band memberships relevant to one scan.
///
/// Band entries block their member classes and vice versa; the scan asks
/// this context whether a (band, class) pair is a membership.
#[derive(Debug, Clone, Default)]
pub struct BandContext {
    classes_by_band: HashMap<Uuid, HashSet<Uuid>>,
}

impl BandContext {
    /// Build the context from membership rows.
    #[must_use]
    pub fn from_memberships(rows: &[ClassBandMembership]) -> Self {
        let mut classes_by_band: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for row in rows {
            classes_by_band
                .entry(row.class_band_id)
                .or_default()
                .insert(row.class_id);
        }
        Self { classes_by_band }
    }

    /// Whether `class_id` is a member of `band_id`.
    #[must_use]
    pub fn band_contains(&self, band_id: Uuid, class_id: Uuid) -> bool {
        self.classes_by_band
            .get(&band_id)
            .is_some_and(|classes| classes.contains(&class_id))
    }
}

/// Scan a slot's entries for collisions with a proposed placement.
///
/// `existing` holds the slot's rows; deleted rows and the excluded entry
/// never produce conflicts. Every collision is reported, not just the
/// first: a placement can collide on teacher, room and class at once.
/// The result is sorted by conflict type, then resource id, then entry
/// id, so identical inputs always yield an identical list.
#[must_use]
pub fn detect_conflicts(
    placement: &ProposedPlacement,
    band_context: &BandContext,
    existing: &[TimetableEntry],
) -> Vec<ScheduleConflict> {
    let mut conflicts = Vec::new();

    for entry in existing {
        if entry.is_deleted {
            continue;
        }
        if placement.exclude_entry_id == Some(entry.id) {
            continue;
        }

        if entry.teacher_id == placement.teacher_id {
            conflicts.push(collision(ConflictType::Teacher, entry.teacher_id, entry));
        }
        if entry.room_id == placement.room_id {
            conflicts.push(collision(ConflictType::Room, entry.room_id, entry));
        }

        match (placement.target, entry.scheduling_target()) {
            (SchedulingTarget::Class(class_id), Some(SchedulingTarget::Class(entry_class)))
                if entry_class == class_id =>
            {
                conflicts.push(collision(ConflictType::Class, entry_class, entry));
            }
            (SchedulingTarget::Class(class_id), Some(SchedulingTarget::ClassBand(entry_band)))
                if band_context.band_contains(entry_band, class_id) =>
            {
                conflicts.push(collision(ConflictType::ClassBand, entry_band, entry));
            }
            (SchedulingTarget::ClassBand(band_id), Some(SchedulingTarget::ClassBand(entry_band)))
                if entry_band == band_id =>
            {
                conflicts.push(collision(ConflictType::ClassBand, entry_band, entry));
            }
            (SchedulingTarget::ClassBand(band_id), Some(SchedulingTarget::Class(entry_class)))
                if band_context.band_contains(band_id, entry_class) =>
            {
                conflicts.push(collision(ConflictType::Class, entry_class, entry));
            }
            _ => {}
        }
    }

    conflicts.sort_by(|a, b| {
        a.conflict_type
            .cmp(&b.conflict_type)
            .then_with(|| a.resource_id.cmp(&b.resource_id))
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });
    conflicts
}

/// Deterministic display label for a colliding resource.
#[must_use]
pub fn resource_label(conflict_type: ConflictType, resource_id: Uuid) -> String {
    let hex = resource_id.as_simple().to_string();
    format!("{} {}", conflict_type.noun(), &hex[..8])
}

fn collision(
    conflict_type: ConflictType,
    resource_id: Uuid,
    entry: &TimetableEntry,
) -> ScheduleConflict {
    let resource_name = resource_label(conflict_type, resource_id);
    let description = format!(
        "{} is already scheduled at day {}, period {}",
        resource_name, entry.day_of_week, entry.period
    );
    ScheduleConflict {
        conflict_type,
        resource_id,
        resource_name,
        binding_id: entry.binding_id,
        entry_id: entry.id,
        day_of_week: entry.day_of_week,
        period: entry.period,
        description,
    }
}

/// Service wiring the pure scan to its database lookups.
#[derive(Clone)]
pub struct ConflictDetector {
    pool: PgPool,
}

impl ConflictDetector {
    /// Create a new conflict detector.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Detect collisions for a placement, loading the slot through the
    /// given connection so callers inside a transaction see their own
    /// snapshot.
    pub async fn detect_at_slot(
        &self,
        conn: &mut PgConnection,
        organization_id: Uuid,
        placement: &ProposedPlacement,
    ) -> ApiResult<Vec<ScheduleConflict>> {
        let existing = TimetableEntry::list_active_at_slot(
            &mut *conn,
            placement.timetable_id,
            placement.day_of_week,
            placement.period,
        )
        .await?;

        let context =
            load_band_context(&mut *conn, organization_id, Some(placement.target), &existing)
                .await?;

        Ok(detect_conflicts(placement, &context, &existing))
    }

    /// Detect collisions on a fresh pool connection.
    ///
    /// Used after a lost commit race, where the failed transaction must
    /// not be reused for the explanatory re-scan.
    pub async fn detect_for_proposal(
        &self,
        organization_id: Uuid,
        placement: &ProposedPlacement,
    ) -> ApiResult<Vec<ScheduleConflict>> {
        let mut conn = self.pool.acquire().await?;
        self.detect_at_slot(&mut conn, organization_id, placement)
            .await
    }

    /// Scan a whole timetable for collisions among its committed entries.
    ///
    /// Each occupied slot's entries are taken in creation order and every
    /// entry is scanned against its predecessors, so a colliding pair is
    /// reported exactly once, attributed to the later entry. Slots are
    /// visited in (day, period) order.
    pub async fn audit_timetable(
        &self,
        organization_id: Uuid,
        timetable_id: Uuid,
    ) -> ApiResult<Vec<ScheduleConflict>> {
        let entries = TimetableEntry::list_active(&self.pool, timetable_id, None, None).await?;
        let context = load_band_context(&self.pool, organization_id, None, &entries).await?;

        let mut slots: BTreeMap<(i32, i32), Vec<TimetableEntry>> = BTreeMap::new();
        for entry in entries {
            slots
                .entry((entry.day_of_week, entry.period))
                .or_default()
                .push(entry);
        }

        let mut conflicts = Vec::new();
        for slot_entries in slots.values() {
            for index in 1..slot_entries.len() {
                let Some(placement) = ProposedPlacement::from_entry(&slot_entries[index]) else {
                    continue;
                };
                conflicts.extend(detect_conflicts(
                    &placement,
                    &context,
                    &slot_entries[..index],
                ));
            }
        }
        Ok(conflicts)
    }
}

/// Load the band memberships a scan can touch: bands containing any
/// involved class, classes inside any involved band.
async fn load_band_context<'e, E>(
    executor: E,
    organization_id: Uuid,
    target: Option<SchedulingTarget>,
    entries: &[TimetableEntry],
) -> ApiResult<BandContext>
where
    E: PgExecutor<'e>,
{
    let mut class_ids: HashSet<Uuid> = HashSet::new();
    let mut band_ids: HashSet<Uuid> = HashSet::new();

    match target {
        Some(SchedulingTarget::Class(id)) => {
            class_ids.insert(id);
        }
        Some(SchedulingTarget::ClassBand(id)) => {
            band_ids.insert(id);
        }
        None => {}
    }
    for entry in entries {
        if let Some(id) = entry.class_id {
            class_ids.insert(id);
        }
        if let Some(id) = entry.class_band_id {
            band_ids.insert(id);
        }
    }

    // The cross check only fires when a class and a band meet.
    if class_ids.is_empty() || band_ids.is_empty() {
        return Ok(BandContext::default());
    }

    let class_ids: Vec<Uuid> = class_ids.into_iter().collect();
    let band_ids: Vec<Uuid> = band_ids.into_iter().collect();
    let rows =
        ClassBandMembership::load_touching(executor, organization_id, &class_ids, &band_ids)
            .await?;
    Ok(BandContext::from_memberships(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry_at(
        timetable_id: Uuid,
        teacher_id: Uuid,
        room_id: Uuid,
        target: SchedulingTarget,
        day_of_week: i32,
        period: i32,
    ) -> TimetableEntry {
        let (class_id, class_band_id) = target.into_columns();
        let now = Utc::now();
        TimetableEntry {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            timetable_id,
            binding_id: Uuid::new_v4(),
            teacher_id,
            subject_id: Uuid::new_v4(),
            room_id,
            class_id,
            class_band_id,
            day_of_week,
            period,
            is_locked: false,
            is_draft: false,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn placement_for(
        timetable_id: Uuid,
        teacher_id: Uuid,
        room_id: Uuid,
        target: SchedulingTarget,
        day_of_week: i32,
        period: i32,
    ) -> ProposedPlacement {
        ProposedPlacement {
            timetable_id,
            binding_id: Uuid::new_v4(),
            teacher_id,
            room_id,
            target,
            day_of_week,
            period,
            exclude_entry_id: None,
        }
    }

    #[test]
    fn test_empty_slot_has_no_conflicts() {
        let placement = placement_for(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        );
        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_same_teacher_conflicts() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let existing = entry_at(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        );
        let placement = placement_for(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        );

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing.clone()]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Teacher);
        assert_eq!(conflicts[0].resource_id, teacher_id);
        assert_eq!(conflicts[0].entry_id, existing.id);
        assert!(conflicts[0].resource_name.starts_with("teacher "));
        assert!(conflicts[0].description.contains("day 1, period 2"));
    }

    #[test]
    fn test_disjoint_resources_do_not_conflict() {
        let timetable_id = Uuid::new_v4();
        let existing = entry_at(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        );
        let placement = placement_for(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        );

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_all_collisions_reported_not_just_first() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();
        let class_id = Uuid::new_v4();
        let existing = entry_at(
            timetable_id,
            teacher_id,
            room_id,
            SchedulingTarget::Class(class_id),
            3,
            4,
        );
        let placement = placement_for(
            timetable_id,
            teacher_id,
            room_id,
            SchedulingTarget::Class(class_id),
            3,
            4,
        );

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing]);
        let types: Vec<ConflictType> = conflicts.iter().map(|c| c.conflict_type).collect();
        assert_eq!(
            types,
            vec![
                ConflictType::Teacher,
                ConflictType::Room,
                ConflictType::Class
            ]
        );
    }

    #[test]
    fn test_excluded_entry_is_skipped() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let existing = entry_at(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );
        let mut placement = placement_for(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );
        placement.exclude_entry_id = Some(existing.id);

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_deleted_entry_never_conflicts() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let mut existing = entry_at(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );
        existing.is_deleted = true;
        existing.deleted_at = Some(Utc::now());

        let placement = placement_for(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_draft_entry_still_occupies_slot() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let mut existing = entry_at(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            2,
            2,
        );
        existing.is_draft = true;

        let placement = placement_for(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            2,
            2,
        );

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Teacher);
    }

    #[test]
    fn test_class_blocked_by_band_containing_it() {
        let timetable_id = Uuid::new_v4();
        let band_id = Uuid::new_v4();
        let class_id = Uuid::new_v4();
        let context = BandContext::from_memberships(&[ClassBandMembership {
            class_band_id: band_id,
            class_id,
        }]);

        let existing = entry_at(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::ClassBand(band_id),
            2,
            1,
        );
        let placement = placement_for(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::Class(class_id),
            2,
            1,
        );

        let conflicts = detect_conflicts(&placement, &context, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::ClassBand);
        assert_eq!(conflicts[0].resource_id, band_id);
    }

    #[test]
    fn test_band_blocked_by_member_class_entry() {
        let timetable_id = Uuid::new_v4();
        let band_id = Uuid::new_v4();
        let class_id = Uuid::new_v4();
        let context = BandContext::from_memberships(&[ClassBandMembership {
            class_band_id: band_id,
            class_id,
        }]);

        let existing = entry_at(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::Class(class_id),
            2,
            1,
        );
        let placement = placement_for(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::ClassBand(band_id),
            2,
            1,
        );

        let conflicts = detect_conflicts(&placement, &context, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Class);
        assert_eq!(conflicts[0].resource_id, class_id);
    }

    #[test]
    fn test_same_band_twice_conflicts() {
        let timetable_id = Uuid::new_v4();
        let band_id = Uuid::new_v4();

        let existing = entry_at(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::ClassBand(band_id),
            5,
            3,
        );
        let placement = placement_for(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::ClassBand(band_id),
            5,
            3,
        );

        let conflicts = detect_conflicts(&placement, &BandContext::default(), &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflict_type, ConflictType::ClassBand);
        assert_eq!(conflicts[0].resource_id, band_id);
    }

    #[test]
    fn test_unrelated_class_does_not_block_band() {
        let timetable_id = Uuid::new_v4();
        let band_id = Uuid::new_v4();
        let member_class = Uuid::new_v4();
        let other_class = Uuid::new_v4();
        let context = BandContext::from_memberships(&[ClassBandMembership {
            class_band_id: band_id,
            class_id: member_class,
        }]);

        let existing = entry_at(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::Class(other_class),
            2,
            1,
        );
        let placement = placement_for(
            timetable_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            SchedulingTarget::ClassBand(band_id),
            2,
            1,
        );

        let conflicts = detect_conflicts(&placement, &context, &[existing]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_conflicts_sorted_by_type_then_resource() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();

        // Two entries: one shares the teacher, the other the room.
        let teacher_clash = entry_at(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );
        let room_clash = entry_at(
            timetable_id,
            Uuid::new_v4(),
            room_id,
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );
        let placement = placement_for(
            timetable_id,
            teacher_id,
            room_id,
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            1,
        );

        // Feed in room-first order; the scan must still report teacher first.
        let conflicts = detect_conflicts(
            &placement,
            &BandContext::default(),
            &[room_clash, teacher_clash],
        );
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].conflict_type, ConflictType::Teacher);
        assert_eq!(conflicts[1].conflict_type, ConflictType::Room);
    }

    #[test]
    fn test_scan_is_pure() {
        let timetable_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let existing = vec![entry_at(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        )];
        let placement = placement_for(
            timetable_id,
            teacher_id,
            Uuid::new_v4(),
            SchedulingTarget::Class(Uuid::new_v4()),
            1,
            2,
        );

        let first = detect_conflicts(&placement, &BandContext::default(), &existing);
        let second = detect_conflicts(&placement, &BandContext::default(), &existing);
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].resource_id, second[0].resource_id);
        assert_eq!(first[0].description, second[0].description);
    }
}
