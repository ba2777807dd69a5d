//! Request and response models for the timetables API.

pub mod binding;
pub mod entry;
pub mod timetable;
pub mod validation;

pub use binding::{
    BindingResponse, CreateBindingRequest, SchedulingSummaryResponse, UpdateBindingRequest,
};
pub use entry::{
    BulkLockRequest, CreateEntryRequest, EntryListQuery, EntryListResponse, EntryResponse,
    RestoreEntryRequest, MAX_BULK_LOCK_IDS,
};
pub use timetable::{CreateTimetableRequest, TimetableResponse};
pub use validation::{
    ConflictListResponse, ConflictType, ScheduleConflict, ScheduleValidationResult,
    ValidateEntryRequest,
};
