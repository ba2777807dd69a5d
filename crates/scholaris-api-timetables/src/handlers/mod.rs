//! HTTP handlers for the timetables API.

pub mod bindings;
pub mod entries;
pub mod timetables;

pub use bindings::{
    create_binding_handler, delete_binding_handler, get_binding_handler,
    scheduling_summary_handler, update_binding_handler,
};
pub use entries::{
    bulk_lock_handler, create_entry_handler, list_entries_handler, remove_entry_handler,
    restore_entry_handler, timetable_conflicts_handler, validate_entry_handler,
};
pub use timetables::{
    create_timetable_handler, delete_timetable_handler, get_timetable_handler,
};
