//! Business logic services for the timetables API.

pub mod binding_service;
pub mod conflict_detector;
pub mod entry_lifecycle;
pub mod quota_tracker;
pub mod schedule_validator;
pub mod timetable_service;

pub use binding_service::BindingService;
pub use conflict_detector::{
    detect_conflicts, resource_label, BandContext, ConflictDetector, ProposedPlacement,
};
pub use entry_lifecycle::EntryLifecycleManager;
pub use quota_tracker::{summarize, QuotaTracker, SchedulingSummary};
pub use schedule_validator::ScheduleValidator;
pub use timetable_service::TimetableService;
