//! Organization context management for scoped queries.
//!
//! Exposes the current organization to the database session as a GUC
//! (`app.current_organization`). Queries still bind `organization_id`
//! explicitly; the GUC exists so row-level security policies can be layered
//! on top without changing query code.

use scholaris_core::OrganizationId;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::DbError;

/// Session variable holding the current organization id.
const ORG_CONTEXT_KEY: &str = "app.current_organization";

/// Set the organization context for the current transaction.
///
/// The setting is transaction-local: it disappears on commit or rollback,
/// so pooled connections never leak context between requests.
///
/// # Errors
///
/// Returns `DbError::QueryFailed` if the setting cannot be applied.
pub async fn set_org_context<'e, E>(
    executor: E,
    organization_id: OrganizationId,
) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT set_config($1, $2, true)")
        .bind(ORG_CONTEXT_KEY)
        .bind(organization_id.to_string())
        .execute(executor)
        .await
        .map_err(DbError::QueryFailed)?;

    Ok(())
}

/// Read the organization context, if one is set.
///
/// # Errors
///
/// Returns `DbError::QueryFailed` on query failure and
/// `DbError::ValidationFailed` if the stored value is not a UUID.
pub async fn get_current_org<'e, E>(executor: E) -> Result<Option<OrganizationId>, DbError>
where
    E: PgExecutor<'e>,
{
    let value: Option<String> = sqlx::query_scalar("SELECT current_setting($1, true)")
        .bind(ORG_CONTEXT_KEY)
        .fetch_one(executor)
        .await
        .map_err(DbError::QueryFailed)?;

    match value {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => {
            let uuid = Uuid::parse_str(&raw).map_err(|e| {
                DbError::ValidationFailed(format!("invalid organization context: {e}"))
            })?;
            Ok(Some(OrganizationId::from_uuid(uuid)))
        }
    }
}

/// Clear the organization context for the current transaction.
///
/// # Errors
///
/// Returns `DbError::QueryFailed` if the setting cannot be cleared.
pub async fn clear_org_context<'e, E>(executor: E) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query("SELECT set_config($1, '', true)")
        .bind(ORG_CONTEXT_KEY)
        .execute(executor)
        .await
        .map_err(DbError::QueryFailed)?;

    Ok(())
}
