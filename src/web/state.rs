//! # Web API Application State
//!
//! Shared state for the web API: the resolved configuration and the task
//! store behind a trait object, so handlers never know which backend is
//! running.

use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::store::{MemoryStore, PgStore, TaskStore};

/// Shared application state for the web API
///
/// Cloned per request by axum; both fields are reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Resolved application configuration
    pub config: Arc<AppConfig>,

    /// Task storage backend selected at startup
    pub store: Arc<dyn TaskStore>,
}

impl AppState {
    /// Create application state with the backend named in the configuration.
    pub async fn build(config: AppConfig) -> crate::error::Result<Self> {
        let store: Arc<dyn TaskStore> = match config.storage {
            StorageBackend::Memory => {
                info!("Using in-memory task store");
                Arc::new(MemoryStore::new())
            }
            StorageBackend::Postgres => {
                info!(url = %config.database.url, "Using PostgreSQL task store");
                Arc::new(PgStore::connect(&config.database).await?)
            }
        };

        Ok(Self {
            config: Arc::new(config),
            store,
        })
    }

    /// Create application state over an existing store. Used by tests and
    /// embedding code that seeds users up front.
    pub fn with_store(config: AppConfig, store: Arc<dyn TaskStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
