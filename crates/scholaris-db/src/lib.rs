//! Database access layer for the scholaris scheduling platform.
//!
//! Provides the PostgreSQL connection pool, embedded migrations, the
//! organization-context helpers used for scoped queries, and one model per
//! table under [`models`].
//!
//! ## Organization scoping
//!
//! Every table carries an `organization_id` column and every query binds it
//! explicitly. In addition, [`set_org_context`] exposes the current
//! organization to the database session as a GUC so row-level policies can
//! be layered on without touching query code.
//!
//! ## Example
//!
//! ```rust,ignore
//! use scholaris_db::{run_migrations, DbPool};
//!
//! let pool = DbPool::connect("postgres://localhost/scholaris").await?;
//! run_migrations(&pool).await?;
//! ```

pub mod context;
pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use context::{clear_org_context, get_current_org, set_org_context};
pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::{DbPool, DbPoolConfig, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
