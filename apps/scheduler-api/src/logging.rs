//! JSON log output for the scheduler binary.
//!
//! Events go to stdout as single-line JSON with flattened fields, ready for
//! whatever collector the deployment ships them to. `RUST_LOG` overrides the
//! configured filter when set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `filter` is the fallback directive (for example `info,scheduler_api=debug`)
/// used when `RUST_LOG` is absent. An unparseable directive aborts the
/// process.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|e| {
            eprintln!("FATAL: invalid log filter {filter:?}: {e}");
            std::process::exit(1);
        });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .flatten_event(true),
        )
        .with(env_filter)
        .init();

    tracing::info!(filter = %filter, "Logging initialized");
}
