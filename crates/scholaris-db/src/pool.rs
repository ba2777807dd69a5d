//! Database connection pool management.
//!
//! Wraps `sqlx::PgPool` so the rest of the workspace constructs pools one
//! way and maps failures into [`DbError`].

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::DbError;

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default timeout when acquiring a connection from the pool.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool construction options.
///
/// The app binary fills this from its environment configuration; tests and
/// tools use [`DbPoolConfig::new`] with the defaults.
#[derive(Debug, Clone)]
pub struct DbPoolConfig {
    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of connections held by the pool.
    pub max_connections: u32,

    /// How long to wait for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl DbPoolConfig {
    /// Create a config for the given URL with default pool sizing.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// A shared PostgreSQL connection pool.
///
/// Cloning is cheap; all clones refer to the same underlying pool.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Connect with default pool sizing.
    ///
    /// # Errors
    ///
    /// Returns `DbError::ConnectionFailed` if the database is unreachable.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        Self::connect_with(&DbPoolConfig::new(database_url)).await
    }

    /// Connect using an explicit [`DbPoolConfig`].
    ///
    /// # Errors
    ///
    /// Returns `DbError::ConnectionFailed` if the database is unreachable.
    pub async fn connect_with(config: &DbPoolConfig) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .map_err(DbError::ConnectionFailed)?;

        tracing::info!(
            max_connections = config.max_connections,
            "Database connection pool established"
        );

        Ok(Self { pool })
    }

    /// Access the underlying `sqlx` pool.
    #[must_use]
    pub fn inner(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = DbPoolConfig::new("postgres://localhost/scholaris");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
        assert_eq!(config.database_url, "postgres://localhost/scholaris");
    }
}
