//! Health check endpoints for monitoring and orchestration.
//!
//! Exposes `/health` for humans and dashboards plus the Kubernetes-style
//! `/health/live` and `/health/ready` probes. The readiness probe flips to
//! 503 during graceful shutdown so load balancers drain traffic before the
//! listener closes.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

/// How long a database ping may take before the check is reported unhealthy.
const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Overall health of the service or one of its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Result of probing a single dependency.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DependencyCheck {
    /// Dependency status
    pub status: HealthState,

    /// Round-trip latency of the probe in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    /// Error message when the probe failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full health report returned by `/health`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthState,

    /// Application version from Cargo.toml
    pub version: String,

    /// Seconds since the service started
    pub uptime_seconds: u64,

    /// Database connectivity check
    pub database: DependencyCheck,

    /// Time the report was produced
    pub timestamp: DateTime<Utc>,
}

/// Response for the liveness probe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LivenessResponse {
    /// Always "alive" while the process can serve requests
    pub status: String,
}

/// Response for the readiness probe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready"
    pub status: String,

    /// Why the service is not ready, when it is not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Ping the database with a trivial query, bounded by [`DB_CHECK_TIMEOUT`].
async fn check_database(state: &AppState) -> DependencyCheck {
    let started = Instant::now();
    let ping = sqlx::query("SELECT 1").execute(&state.db);

    match tokio::time::timeout(DB_CHECK_TIMEOUT, ping).await {
        Ok(Ok(_)) => DependencyCheck {
            status: HealthState::Healthy,
            latency_ms: Some(started.elapsed().as_millis() as u64),
            error: None,
        },
        Ok(Err(e)) => DependencyCheck {
            status: HealthState::Unhealthy,
            latency_ms: None,
            error: Some(e.to_string()),
        },
        Err(_) => DependencyCheck {
            status: HealthState::Unhealthy,
            latency_ms: None,
            error: Some(format!(
                "Database ping timed out after {}s",
                DB_CHECK_TIMEOUT.as_secs()
            )),
        },
    }
}

/// Full health report with a live database check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "A dependency is unhealthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state).await;

    let status = if database.status == HealthState::Healthy {
        HealthState::Healthy
    } else {
        HealthState::Unhealthy
    };

    let code = match status {
        HealthState::Healthy => StatusCode::OK,
        HealthState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status,
        version: state.version.to_string(),
        uptime_seconds: state.uptime_seconds(),
        database,
        timestamp: Utc::now(),
    };

    (code, Json(response))
}

/// Liveness probe: 200 whenever the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Process is alive", body = LivenessResponse)
    ),
    tag = "health"
)]
pub async fn live_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe: 503 while shutting down or when the database is
/// unreachable, 200 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready for traffic", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    ),
    tag = "health"
)]
pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    if state.is_shutting_down() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready".to_string(),
                reason: Some("shutting_down".to_string()),
            }),
        );
    }

    if !state.is_startup_complete() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready".to_string(),
                reason: Some("starting".to_string()),
            }),
        );
    }

    let database = check_database(&state).await;
    if database.status != HealthState::Healthy {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready".to_string(),
                reason: Some("database_unavailable".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready".to_string(),
            reason: None,
        }),
    )
}
