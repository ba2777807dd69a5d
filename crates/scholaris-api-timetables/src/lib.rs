//! Timetable placement and conflict-validation API for scholaris.
//!
//! Provides the scheduling engine endpoints: slot validation, manual entry
//! placement, soft removal and restore, bulk lock management, and the
//! binding/timetable resources they operate on.
//!
//! ## Scoping
//!
//! Every endpoint is organization-scoped. Callers pass the organization as the
//! `X-Organization-Id` header; handlers never fall back to an implicit default.
//!
//! ## Validation model
//!
//! Placement problems are data, not exceptions. `POST /entries/validate`
//! always answers 200 with a [`models::ScheduleValidationResult`]; only the
//! committing endpoints turn an invalid result into a 409.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::{ApiResult, TimetablesError};
pub use router::{bindings_router, timetables_router, TimetablesState};
