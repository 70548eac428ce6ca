//! # Web API Middleware
//!
//! Middleware stack for the web API: request id generation, timeout, CORS,
//! request tracing, and bearer-token authentication for the protected
//! routes.

pub mod auth;
pub mod request_id;

use axum::middleware;
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Apply the common middleware stack for a router with app state
///
/// Layers nest from the last `.layer` call outward: tracing wraps CORS,
/// CORS wraps the timeout, and the timeout wraps request-id generation.
/// The request-id span therefore opens inside the `TraceLayer` span and
/// covers all route handling.
///
/// Authentication is applied separately, to the protected routes only,
/// before this stack.
pub fn apply_middleware_stack(
    router: Router<AppState>,
    request_timeout: Duration,
) -> Router<AppState> {
    router
        .layer(middleware::from_fn(request_id::add_request_id))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Create CORS layer with appropriate settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
