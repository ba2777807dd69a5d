//! Scheduler API binary.
//!
//! Wires configuration, logging, the database pool and migrations together,
//! then serves the timetable and binding routers behind health probes and a
//! Swagger UI.

mod config;
mod health;
mod logging;
mod openapi;
mod state;

use axum::{routing::get, Router};
use config::AppConfig;
use health::{health_handler, live_handler, ready_handler};
use openapi::swagger_routes;
use scholaris_api_timetables::{bindings_router, timetables_router};
use scholaris_db::{run_migrations, DbPool};
use state::AppState;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        env = %config.app_env,
        "Starting scheduler API"
    );

    let db = DbPool::connect_with(&config.db_pool_config())
        .await
        .unwrap_or_else(|e| {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        });

    if let Err(e) = run_migrations(&db).await {
        eprintln!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }
    info!("Database migrations applied");

    let pool = db.inner().clone();
    let app_state = AppState::new(pool.clone());

    // Grab the flag before app_state moves into the router.
    let shutting_down = app_state.shutting_down.clone();

    app_state.mark_startup_complete();
    info!("Startup complete, readiness probe will return 200");

    let cors = build_cors_layer(&config.cors_origins);

    let app = Router::new()
        // Probes stay outside the organization-scoped routers.
        .route("/health", get(health_handler))
        .route("/health/live", get(live_handler))
        .route("/health/ready", get(ready_handler))
        .merge(swagger_routes())
        .with_state(app_state)
        .merge(timetables_router(pool.clone()))
        .merge(bindings_router(pool))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = config.bind_addr().parse().unwrap_or_else(|e| {
        tracing::error!("Invalid bind address '{}': {e}", config.bind_addr());
        std::process::exit(1);
    });

    info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        tracing::error!("Failed to bind to address {addr}: {e}");
        std::process::exit(1);
    });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutting_down))
        .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Assemble the CORS layer from the configured origin list.
///
/// A lone `*` allows any origin without credentials. Explicit origins get
/// credential support, which rules out `Any` for methods and headers, so
/// those are spelled out.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
    use axum::http::{HeaderName, HeaderValue, Method};
    use tower_http::cors::AllowOrigin;

    let base = CorsLayer::new().max_age(Duration::from_secs(3600));

    if matches!(origins, [only] if only == "*") {
        return base
            .allow_origin(AllowOrigin::any())
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    let checker = AllowOrigin::predicate(
        move |origin: &HeaderValue, _: &axum::http::request::Parts| {
            if allowed.contains(origin) {
                return true;
            }
            tracing::warn!(
                origin = %origin.to_str().unwrap_or("<non-utf8>"),
                "CORS origin rejected"
            );
            false
        },
    );

    base.allow_origin(checker)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static("x-organization-id"),
            HeaderName::from_static("x-request-id"),
        ])
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
///
/// Flips `shutting_down` before resolving, so the readiness probe reports
/// 503 and load balancers drain the instance while axum finishes in-flight
/// requests.
async fn shutdown_signal(shutting_down: Arc<AtomicBool>) {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            // Keep waiting; SIGTERM can still end the process.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    shutting_down.store(true, Ordering::Release);
    info!("Readiness probe now reports unavailable, draining connections");
}
