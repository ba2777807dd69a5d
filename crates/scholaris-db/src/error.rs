//! Error types shared by the scholaris-db crate.

use thiserror::Error;

/// Errors surfaced by pool setup, migrations, and scoped queries.
///
/// Query-level failures keep the underlying [`sqlx::Error`] as their source,
/// so callers can still reach driver details (constraint names, error codes)
/// when translating a failure into an API response.
#[derive(Debug, Error)]
pub enum DbError {
    /// The pool could not reach the database.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// An embedded migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A query failed to execute.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// An organization-scoped statement ran without [`set_org_context`]
    /// having been called on the connection first.
    ///
    /// [`set_org_context`]: crate::set_org_context
    #[error("Organization context required but not set")]
    OrgContextMissing,

    /// A row the caller expected is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored data failed a consistency check while being read back.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = DbError::NotFound("timetable 7".to_string());
        assert_eq!(err.to_string(), "Not found: timetable 7");

        let err = DbError::OrgContextMissing;
        assert_eq!(err.to_string(), "Organization context required but not set");
    }

    #[test]
    fn query_failure_keeps_source() {
        use std::error::Error as _;

        let err = DbError::QueryFailed(sqlx::Error::RowNotFound);
        assert!(err.source().is_some());
    }
}
