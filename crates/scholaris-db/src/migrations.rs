//! Embedded schema migrations.

use crate::error::DbError;
use crate::pool::DbPool;

/// Apply all pending migrations.
///
/// The SQL files under `migrations/` are embedded at compile time and run
/// in filename order. The app binary calls this before accepting traffic;
/// the integration test harness calls it when preparing its database.
///
/// # Errors
///
/// Returns `DbError::MigrationFailed` if any migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool.inner())
        .await
        .map_err(DbError::MigrationFailed)?;

    tracing::info!("Database schema is up to date");
    Ok(())
}
