//! # Web API Module
//!
//! REST surface for the task matrix: task CRUD and filters, statistics,
//! user administration, and health checking. Routes split into a public
//! set (welcome, health) and a protected set behind the bearer-token
//! middleware.

use axum::Router;
use std::time::Duration;
use tracing::info;

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // Protected routes - auth middleware applied
    let protected_routes = Router::new()
        .merge(routes::task_routes())
        .merge(routes::stats_routes())
        .merge(routes::admin_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate_request,
        ));

    // Public routes - never require auth
    let app = Router::new()
        .merge(routes::public_routes())
        .merge(protected_routes);

    let request_timeout = Duration::from_secs(state.config.web.request_timeout_secs);
    let app = middleware::apply_middleware_stack(app, request_timeout).with_state(state);

    info!("Web application created with all routes and middleware");
    app
}
