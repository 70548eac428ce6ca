//! # Health and Welcome Handlers
//!
//! The two unauthenticated endpoints: a root welcome banner and a health
//! check that probes the task store. The health check always answers 200;
//! a failing probe flips the status field to "degraded" so load balancers
//! and humans see the same body shape either way.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error};

use crate::web::state::AppState;

/// Welcome banner response
#[derive(Serialize)]
pub struct WelcomeResponse {
    service: String,
    version: String,
    message: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    checks: HashMap<String, HealthCheck>,
}

/// Individual health check result
#[derive(Serialize)]
pub struct HealthCheck {
    status: String,
    message: Option<String>,
    duration_ms: u64,
}

/// Welcome endpoint: GET /
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        service: "taskmatrix".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "Eisenhower matrix task API".to_string(),
    })
}

/// Health check endpoint: GET /health
///
/// Always available, even when the store is down.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("Performing health check");

    let mut checks = HashMap::new();
    checks.insert("store".to_string(), check_store_health(&state).await);

    let overall_healthy = checks.values().all(|check| check.status == "healthy");

    Json(HealthResponse {
        status: if overall_healthy {
            "healthy"
        } else {
            "degraded"
        }
        .to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
    })
}

async fn check_store_health(state: &AppState) -> HealthCheck {
    let start = std::time::Instant::now();

    match state.store.health_check().await {
        Ok(()) => HealthCheck {
            status: "healthy".to_string(),
            message: None,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        Err(e) => {
            error!(error = %e, "Store health check failed");
            HealthCheck {
                status: "unhealthy".to_string(),
                message: Some(format!("Store probe failed: {e}")),
                duration_ms: start.elapsed().as_millis() as u64,
            }
        }
    }
}
