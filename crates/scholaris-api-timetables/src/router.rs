//! Router configuration for the timetables API.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::PgPool;

use crate::handlers::{
    bulk_lock_handler, create_binding_handler, create_entry_handler, create_timetable_handler,
    delete_binding_handler, delete_timetable_handler, get_binding_handler, get_timetable_handler,
    list_entries_handler, remove_entry_handler, restore_entry_handler, scheduling_summary_handler,
    timetable_conflicts_handler, update_binding_handler, validate_entry_handler,
};
use crate::services::{
    BindingService, ConflictDetector, EntryLifecycleManager, QuotaTracker, ScheduleValidator,
    TimetableService,
};

/// Shared state for all timetables API routes.
#[derive(Clone)]
pub struct TimetablesState {
    pub pool: PgPool,
    pub detector: Arc<ConflictDetector>,
    pub quota: Arc<QuotaTracker>,
    pub validator: Arc<ScheduleValidator>,
    pub lifecycle: Arc<EntryLifecycleManager>,
    pub bindings: Arc<BindingService>,
    pub timetables: Arc<TimetableService>,
}

impl TimetablesState {
    /// Wire the full service graph from a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let detector = Arc::new(ConflictDetector::new(pool.clone()));
        let quota = Arc::new(QuotaTracker::new(pool.clone()));
        let validator = Arc::new(ScheduleValidator::new(
            pool.clone(),
            Arc::clone(&detector),
            Arc::clone(&quota),
        ));
        let lifecycle = Arc::new(EntryLifecycleManager::new(
            pool.clone(),
            Arc::clone(&validator),
            Arc::clone(&detector),
        ));
        let bindings = Arc::new(BindingService::new(pool.clone()));
        let timetables = Arc::new(TimetableService::new(pool.clone()));

        Self {
            pool,
            detector,
            quota,
            validator,
            lifecycle,
            bindings,
            timetables,
        }
    }
}

/// Build the timetable and entry routes.
pub fn timetables_router(pool: PgPool) -> Router {
    let state = TimetablesState::new(pool);

    Router::new()
        .route("/timetables", post(create_timetable_handler))
        .route(
            "/timetables/:id",
            get(get_timetable_handler).delete(delete_timetable_handler),
        )
        .route(
            "/timetables/:id/entries",
            post(create_entry_handler).get(list_entries_handler),
        )
        .route(
            "/timetables/:id/entries/validate",
            post(validate_entry_handler),
        )
        .route(
            "/timetables/:id/entries/restore",
            post(restore_entry_handler),
        )
        .route(
            "/timetables/:id/entries/lock-status",
            put(bulk_lock_handler),
        )
        .route("/timetables/:id/conflicts", get(timetable_conflicts_handler))
        .route("/entries/:entry_id", delete(remove_entry_handler))
        .with_state(state)
}

/// Build the binding routes.
pub fn bindings_router(pool: PgPool) -> Router {
    let state = TimetablesState::new(pool);

    Router::new()
        .route("/bindings", post(create_binding_handler))
        .route(
            "/bindings/:id",
            get(get_binding_handler)
                .patch(update_binding_handler)
                .delete(delete_binding_handler),
        )
        .route(
            "/bindings/:id/scheduling-summary",
            get(scheduling_summary_handler),
        )
        .with_state(state)
}
