//! Process configuration.
//!
//! Everything comes from environment variables, with `.env` loaded first so
//! local development can keep its settings in a file. Loading is fail-fast:
//! a missing `DATABASE_URL` or a nonsense value stops the binary before it
//! binds a socket.

use scholaris_db::{DbPoolConfig, DEFAULT_MAX_CONNECTIONS};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Deployment mode, read from `APP_ENV`.
///
/// Production tightens CORS: a wildcard origin list refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    /// Interpret an `APP_ENV` value, case-insensitively.
    ///
    /// Unknown labels fall back to development with a warning rather than
    /// refusing to boot.
    pub fn from_label(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") || value.eq_ignore_ascii_case("prod") {
            return Self::Production;
        }
        if !value.eq_ignore_ascii_case("development") && !value.eq_ignore_ascii_case("dev") {
            tracing::warn!(value, "Unknown APP_ENV, assuming development");
        }
        Self::Development
    }

    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Development => "development",
            Self::Production => "production",
        };
        f.write_str(label)
    }
}

/// Why configuration loading failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

fn invalid(var: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        message: message.into(),
    }
}

fn optional_var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|e| invalid(name, format!("{e}"))),
        Err(_) => Ok(default),
    }
}

/// Everything the binary needs to know at startup.
#[derive(Clone)]
pub struct AppConfig {
    /// Deployment mode (development or production).
    pub app_env: AppEnvironment,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Fallback tracing filter when `RUST_LOG` is absent.
    pub rust_log: String,

    /// Allowed CORS origins; a single `*` means any origin.
    pub cors_origins: Vec<String>,

    /// Interface to bind.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Upper bound on pooled database connections.
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection before giving up.
    pub db_acquire_timeout_secs: u64,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_env", &self.app_env)
            .field("database_url", &"[redacted]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("db_max_connections", &self.db_max_connections)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` must be set. The rest has defaults:
    ///
    /// - `APP_ENV`: `development`
    /// - `RUST_LOG`: `info`
    /// - `CORS_ORIGINS` (comma-separated): `*`
    /// - `HOST`: `0.0.0.0`
    /// - `PORT`: `8080`
    /// - `DB_MAX_CONNECTIONS`: `10`
    /// - `DB_ACQUIRE_TIMEOUT_SECS`: `5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a value
    /// does not parse, and in production when the CORS list is unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let app_env = AppEnvironment::from_label(&optional_var("APP_ENV", "development"));

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let cors_origins: Vec<String> = optional_var("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .collect();
        validate_cors_origins(&cors_origins, app_env)?;

        let port: u16 = parsed_var("PORT", 8080)?;
        if port == 0 {
            return Err(invalid("PORT", "port 0 is not bindable"));
        }

        let db_max_connections: u32 = parsed_var("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(invalid("DB_MAX_CONNECTIONS", "pool needs at least one connection"));
        }

        let db_acquire_timeout_secs: u64 = parsed_var("DB_ACQUIRE_TIMEOUT_SECS", 5)?;

        Ok(Self {
            app_env,
            database_url,
            rust_log: optional_var("RUST_LOG", "info"),
            cors_origins,
            host: optional_var("HOST", "0.0.0.0"),
            port,
            db_max_connections,
            db_acquire_timeout_secs,
        })
    }

    /// `host:port` as a bindable address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for `DbPool::connect_with`.
    #[must_use]
    pub fn db_pool_config(&self) -> DbPoolConfig {
        DbPoolConfig {
            database_url: self.database_url.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
        }
    }
}

/// Sanity-check the origin list before the CORS layer is built from it.
///
/// Production refuses wildcards and origins without an http(s) scheme;
/// development logs a warning and carries on. A trailing slash is only ever
/// warned about, since browsers send the `Origin` header without one.
fn validate_cors_origins(origins: &[String], app_env: AppEnvironment) -> Result<(), ConfigError> {
    for origin in origins {
        if origin == "*" {
            if app_env.is_production() {
                return Err(invalid("CORS_ORIGINS", "wildcard '*' is not allowed in production"));
            }
            continue;
        }

        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            let message = format!("origin '{origin}' must start with http:// or https://");
            if app_env.is_production() {
                return Err(invalid("CORS_ORIGINS", message));
            }
            tracing::warn!(origin = %origin, "{message}");
            continue;
        }

        if origin.ends_with('/') {
            tracing::warn!(origin = %origin, "CORS origin ends with '/'");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            app_env: AppEnvironment::Development,
            database_url: "postgres://localhost/scholaris_test".to_string(),
            rust_log: "info".to_string(),
            cors_origins: vec!["*".to_string()],
            host: "127.0.0.1".to_string(),
            port: 8080,
            db_max_connections: 10,
            db_acquire_timeout_secs: 5,
        }
    }

    #[test]
    fn app_env_labels_parse_case_insensitively() {
        for label in ["production", "PROD", "Production"] {
            assert_eq!(AppEnvironment::from_label(label), AppEnvironment::Production);
        }
        for label in ["development", "dev", "DEV"] {
            assert_eq!(AppEnvironment::from_label(label), AppEnvironment::Development);
        }
    }

    #[test]
    fn unknown_app_env_falls_back_to_development() {
        assert_eq!(
            AppEnvironment::from_label("staging"),
            AppEnvironment::Development
        );
    }

    #[test]
    fn app_env_display_round_trips() {
        assert_eq!(AppEnvironment::Development.to_string(), "development");
        assert_eq!(AppEnvironment::Production.to_string(), "production");
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        assert_eq!(sample_config().bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn debug_output_redacts_the_database_url() {
        let rendered = format!("{:?}", sample_config());
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("postgres://"));
    }

    #[test]
    fn pool_config_carries_the_tuning_knobs() {
        let mut config = sample_config();
        config.db_max_connections = 25;
        config.db_acquire_timeout_secs = 3;

        let pool = config.db_pool_config();
        assert_eq!(pool.max_connections, 25);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(3));
        assert_eq!(pool.database_url, config.database_url);
    }

    #[test]
    fn wildcard_origins_pass_in_development_only() {
        let origins = vec!["*".to_string()];
        assert!(validate_cors_origins(&origins, AppEnvironment::Development).is_ok());

        let rejected = validate_cors_origins(&origins, AppEnvironment::Production);
        assert!(matches!(
            rejected,
            Err(ConfigError::InvalidValue { var, .. }) if var == "CORS_ORIGINS"
        ));
    }

    #[test]
    fn schemeless_origin_fails_in_production() {
        let origins = vec!["app.example.com".to_string()];
        assert!(validate_cors_origins(&origins, AppEnvironment::Production).is_err());
        assert!(validate_cors_origins(&origins, AppEnvironment::Development).is_ok());
    }

    #[test]
    fn explicit_origins_pass_in_production() {
        let origins = vec![
            "https://app.example.com".to_string(),
            "http://localhost:3000".to_string(),
        ];
        assert!(validate_cors_origins(&origins, AppEnvironment::Production).is_ok());
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let origins = vec!["https://app.example.com/".to_string()];
        assert!(validate_cors_origins(&origins, AppEnvironment::Production).is_ok());
    }
}
