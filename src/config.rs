//! # Configuration
//!
//! Environment-driven configuration with development defaults. Every knob
//! can be left unset for a local run: the server then binds 0.0.0.0:3000,
//! keeps tasks in memory, and answers without authentication.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TaskmatrixError};

/// Which [`TaskStore`](crate::store::TaskStore) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local store, lost on restart. The development default.
    #[default]
    Memory,
    /// PostgreSQL via sqlx.
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = TaskmatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(TaskmatrixError::ConfigurationError(format!(
                "unknown storage backend '{other}' (expected 'memory' or 'postgres')"
            ))),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address the listener binds, e.g. "0.0.0.0:3000".
    pub bind_address: String,
    /// Per-request timeout applied by the middleware stack.
    pub request_timeout_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// PostgreSQL pool settings. Ignored when the memory backend is selected.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/taskmatrix_development".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// Bearer-token authentication toggle.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// When false, every request runs as an anonymous admin-equivalent
    /// caller. Meant for local development only.
    pub enabled: bool,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub web: WebConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TASKMATRIX_STORAGE` | `memory` |
    /// | `TASKMATRIX_BIND_ADDRESS` | `0.0.0.0:3000` |
    /// | `TASKMATRIX_REQUEST_TIMEOUT_SECS` | `30` |
    /// | `DATABASE_URL` | `postgresql://localhost/taskmatrix_development` |
    /// | `TASKMATRIX_DB_MAX_CONNECTIONS` | `10` |
    /// | `TASKMATRIX_DB_ACQUIRE_TIMEOUT_SECS` | `10` |
    /// | `TASKMATRIX_AUTH_ENABLED` | `false` |
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(storage) = env::var("TASKMATRIX_STORAGE") {
            config.storage = storage.parse()?;
        }

        if let Ok(bind_address) = env::var("TASKMATRIX_BIND_ADDRESS") {
            config.web.bind_address = bind_address;
        }

        if let Ok(timeout) = env::var("TASKMATRIX_REQUEST_TIMEOUT_SECS") {
            config.web.request_timeout_secs = timeout.parse().map_err(|e| {
                TaskmatrixError::ConfigurationError(format!("Invalid request_timeout_secs: {e}"))
            })?;
        }

        if let Ok(db_url) = env::var("DATABASE_URL") {
            config.database.url = db_url;
        }

        if let Ok(max_connections) = env::var("TASKMATRIX_DB_MAX_CONNECTIONS") {
            config.database.max_connections = max_connections.parse().map_err(|e| {
                TaskmatrixError::ConfigurationError(format!("Invalid max_connections: {e}"))
            })?;
        }

        if let Ok(acquire_timeout) = env::var("TASKMATRIX_DB_ACQUIRE_TIMEOUT_SECS") {
            config.database.acquire_timeout_secs = acquire_timeout.parse().map_err(|e| {
                TaskmatrixError::ConfigurationError(format!("Invalid acquire_timeout_secs: {e}"))
            })?;
        }

        if let Ok(auth_enabled) = env::var("TASKMATRIX_AUTH_ENABLED") {
            config.auth.enabled = auth_enabled.parse().map_err(|e| {
                TaskmatrixError::ConfigurationError(format!("Invalid auth_enabled: {e}"))
            })?;
        }

        Ok(config)
    }
}
