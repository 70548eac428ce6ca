//! # Web API Routes
//!
//! Route definitions for all endpoints organized by functionality. The
//! literal segments (`/tasks/search`, `/tasks/today`) coexist with the
//! `/tasks/{id}` capture because the router prefers static matches.

use axum::{
    routing::{get, patch},
    Router,
};

use crate::web::{handlers, state::AppState};

/// Routes that never require authentication
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::welcome))
        .route("/health", get(handlers::health::health))
}

/// Task management routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route("/tasks/search", get(handlers::tasks::search_tasks))
        .route("/tasks/today", get(handlers::tasks::tasks_due_today))
        .route(
            "/tasks/quadrant/{quadrant}",
            get(handlers::tasks::tasks_by_quadrant),
        )
        .route(
            "/tasks/status/{status}",
            get(handlers::tasks::tasks_by_status),
        )
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            "/tasks/{id}/complete",
            patch(handlers::tasks::complete_task),
        )
}

/// Statistics routes
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::stats::get_stats))
        .route("/stats/deadlines", get(handlers::stats::get_deadline_stats))
}

/// Admin routes; role enforcement happens in the handlers
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users", get(handlers::admin::list_users))
}
