//! Integration tests for the slot conflict scan.
//!
//! Exercises the pure detection path end to end: placements against
//! loaded entries, band membership context, and the wire shape of the
//! reported conflicts.

use chrono::Utc;
use scholaris_api_timetables::models::{ConflictListResponse, ConflictType, ScheduleConflict};
use scholaris_api_timetables::services::{
    detect_conflicts, resource_label, BandContext, ProposedPlacement,
};
use scholaris_db::models::{ClassBandMembership, SchedulingTarget, TimetableEntry};
use uuid::Uuid;

fn entry(
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

fn placement(
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

/// Test that a teacher scheduled twice at the same slot is reported.
#[test]
fn test_double_booked_teacher_is_reported() {
    let timetable_id = Uuid::new_v4();
    let teacher_id = Uuid::new_v4();

    let existing = entry(
        timetable_id,
        teacher_id,
        Uuid::new_v4(),
        SchedulingTarget::Class(Uuid::new_v4()),
        2,
        3,
    );
    let proposed = placement(
        timetable_id,
        teacher_id,
        Uuid::new_v4(),
        SchedulingTarget::Class(Uuid::new_v4()),
        2,
        3,
    );

    let conflicts = detect_conflicts(&proposed, &BandContext::default(), &[existing.clone()]);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::Teacher);
    assert_eq!(conflicts[0].resource_id, teacher_id);
    assert_eq!(conflicts[0].entry_id, existing.id);
    assert_eq!(conflicts[0].binding_id, existing.binding_id);
    assert_eq!(conflicts[0].day_of_week, 2);
    assert_eq!(conflicts[0].period, 3);
}

/// Test that a placement colliding on every resource reports each
/// collision separately.
#[test]
fn test_full_collision_reports_every_resource() {
    let timetable_id = Uuid::new_v4();
    let teacher_id = Uuid::new_v4();
    let room_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();

    let existing = entry(
        timetable_id,
        teacher_id,
        room_id,
        SchedulingTarget::Class(class_id),
        1,
        1,
    );
    let proposed = placement(
        timetable_id,
        teacher_id,
        room_id,
        SchedulingTarget::Class(class_id),
        1,
        1,
    );

    let conflicts = detect_conflicts(&proposed, &BandContext::default(), &[existing]);

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

/// Test that a band entry blocks placements for its member classes.
#[test]
fn test_band_entry_blocks_member_class() {
    let timetable_id = Uuid::new_v4();
    let band_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();

    let context = BandContext::from_memberships(&[ClassBandMembership {
        class_band_id: band_id,
        class_id,
    }]);

    let existing = entry(
        timetable_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        SchedulingTarget::ClassBand(band_id),
        4,
        2,
    );
    let proposed = placement(
        timetable_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        SchedulingTarget::Class(class_id),
        4,
        2,
    );

    let conflicts = detect_conflicts(&proposed, &context, &[existing]);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::ClassBand);
    assert_eq!(conflicts[0].resource_id, band_id);
}

/// Test that a member class entry blocks a placement for its band.
#[test]
fn test_member_class_entry_blocks_band() {
    let timetable_id = Uuid::new_v4();
    let band_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();

    let context = BandContext::from_memberships(&[ClassBandMembership {
        class_band_id: band_id,
        class_id,
    }]);

    let existing = entry(
        timetable_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        SchedulingTarget::Class(class_id),
        4,
        2,
    );
    let proposed = placement(
        timetable_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        SchedulingTarget::ClassBand(band_id),
        4,
        2,
    );

    let conflicts = detect_conflicts(&proposed, &context, &[existing]);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::Class);
    assert_eq!(conflicts[0].resource_id, class_id);
}

/// Test that two different bands at the same slot do not collide when
/// they share no resources.
#[test]
fn test_distinct_bands_do_not_collide() {
    let timetable_id = Uuid::new_v4();
    let band_a = Uuid::new_v4();
    let band_b = Uuid::new_v4();

    let context = BandContext::from_memberships(&[
        ClassBandMembership {
            class_band_id: band_a,
            class_id: Uuid::new_v4(),
        },
        ClassBandMembership {
            class_band_id: band_b,
            class_id: Uuid::new_v4(),
        },
    ]);

    let existing = entry(
        timetable_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        SchedulingTarget::ClassBand(band_a),
        1,
        1,
    );
    let proposed = placement(
        timetable_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        SchedulingTarget::ClassBand(band_b),
        1,
        1,
    );

    let conflicts = detect_conflicts(&proposed, &context, &[existing]);
    assert!(conflicts.is_empty());
}

/// Test that the scan ignores soft-deleted rows and the excluded entry.
#[test]
fn test_deleted_and_excluded_rows_are_invisible() {
    let timetable_id = Uuid::new_v4();
    let teacher_id = Uuid::new_v4();

    let mut deleted = entry(
        timetable_id,
        teacher_id,
        Uuid::new_v4(),
        SchedulingTarget::Class(Uuid::new_v4()),
        1,
        1,
    );
    deleted.is_deleted = true;
    deleted.deleted_at = Some(Utc::now());

    let own = entry(
        timetable_id,
        teacher_id,
        Uuid::new_v4(),
        SchedulingTarget::Class(Uuid::new_v4()),
        1,
        1,
    );

    let mut proposed = placement(
        timetable_id,
        teacher_id,
        Uuid::new_v4(),
        SchedulingTarget::Class(Uuid::new_v4()),
        1,
        1,
    );
    proposed.exclude_entry_id = Some(own.id);

    let conflicts = detect_conflicts(&proposed, &BandContext::default(), &[deleted, own]);
    assert!(conflicts.is_empty());
}

/// Test that repeated scans of the same inputs yield an identical list.
#[test]
fn test_scan_order_is_deterministic() {
    let timetable_id = Uuid::new_v4();
    let teacher_id = Uuid::new_v4();
    let room_id = Uuid::new_v4();

    let teacher_clash = entry(
        timetable_id,
        teacher_id,
        Uuid::new_v4(),
        SchedulingTarget::Class(Uuid::new_v4()),
        3,
        1,
    );
    let room_clash = entry(
        timetable_id,
        Uuid::new_v4(),
        room_id,
        SchedulingTarget::Class(Uuid::new_v4()),
        3,
        1,
    );
    let proposed = placement(
        timetable_id,
        teacher_id,
        room_id,
        SchedulingTarget::Class(Uuid::new_v4()),
        3,
        1,
    );

    let forward = detect_conflicts(
        &proposed,
        &BandContext::default(),
        &[teacher_clash.clone(), room_clash.clone()],
    );
    let reversed = detect_conflicts(
        &proposed,
        &BandContext::default(),
        &[room_clash, teacher_clash],
    );

    assert_eq!(forward.len(), 2);
    assert_eq!(forward[0].conflict_type, reversed[0].conflict_type);
    assert_eq!(forward[0].entry_id, reversed[0].entry_id);
    assert_eq!(forward[1].conflict_type, reversed[1].conflict_type);
}

/// Test the wire format of a reported conflict.
#[test]
fn test_conflict_serialization() {
    let conflict = ScheduleConflict {
        conflict_type: ConflictType::ClassBand,
        resource_id: Uuid::nil(),
        resource_name: "class band 00000000".to_string(),
        binding_id: Uuid::nil(),
        entry_id: Uuid::nil(),
        day_of_week: 2,
        period: 4,
        description: "class band 00000000 is already scheduled at day 2, period 4".to_string(),
    };

    let json = serde_json::to_string(&conflict).unwrap();
    assert!(json.contains("\"conflict_type\":\"CLASS_BAND\""));
    assert!(json.contains("\"day_of_week\":2"));
    assert!(json.contains("\"period\":4"));
    assert!(json.contains("already scheduled"));
}

/// Test `resource_label` stability for identical inputs.
#[test]
fn test_resource_label_is_stable() {
    let id = Uuid::new_v4();
    let first = resource_label(ConflictType::Room, id);
    let second = resource_label(ConflictType::Room, id);
    assert_eq!(first, second);
    assert!(first.starts_with("room "));

    let nil = resource_label(ConflictType::Teacher, Uuid::nil());
    assert_eq!(nil, "teacher 00000000");
}

/// Test `ConflictListResponse` aggregation.
#[test]
fn test_conflict_list_response_total() {
    let conflict = ScheduleConflict {
        conflict_type: ConflictType::Teacher,
        resource_id: Uuid::nil(),
        resource_name: "teacher 00000000".to_string(),
        binding_id: Uuid::nil(),
        entry_id: Uuid::nil(),
        day_of_week: 1,
        period: 1,
        description: "teacher 00000000 is already scheduled at day 1, period 1".to_string(),
    };

    let response = ConflictListResponse::from_conflicts(vec![conflict.clone(), conflict]);
    assert_eq!(response.total, 2);
    assert_eq!(response.conflicts.len(), 2);

    let empty = ConflictListResponse::from_conflicts(vec![]);
    assert_eq!(empty.total, 0);

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"total\":2"));
}
