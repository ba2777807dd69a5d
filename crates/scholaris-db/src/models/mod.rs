//! Database entity models for scholaris-db.
//!
//! These models represent the database tables and provide
//! type-safe interactions with PostgreSQL.

pub mod binding;
pub mod class_band;
pub mod period;
pub mod plan_settings;
pub mod timetable;
pub mod timetable_entry;

pub use binding::{Binding, BindingStatus, CreateBinding, SchedulingTarget, UpdateBinding};
pub use class_band::{ClassBand, ClassBandMembership};
pub use period::{CreatePeriod, Period};
pub use plan_settings::{CreatePlanSettings, PlanSettings};
pub use timetable::{CreateTimetable, Timetable, TimetableStatus};
pub use timetable_entry::{CreateTimetableEntry, EntryState, TimetableEntry};
