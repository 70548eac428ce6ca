//! # Statistics Handlers
//!
//! Aggregate counts and the deadline report. Both run over the caller's
//! visible tasks, so a regular user sees statistics for their own tasks
//! while an admin sees the whole system.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::debug;

use crate::access::Caller;
use crate::stats::{self, DeadlineEntry, TaskStats};
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

/// Aggregate task counts: GET /stats
pub async fn get_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<TaskStats>> {
    debug!(user_id = caller.user_id, "Computing task statistics");
    let tasks = state.store.list_tasks(&caller).await?;
    Ok(Json(stats::aggregate(&tasks)))
}

/// Deadline report over pending tasks: GET /stats/deadlines
pub async fn get_deadline_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<DeadlineEntry>>> {
    debug!(user_id = caller.user_id, "Computing deadline report");
    let tasks = state.store.list_tasks(&caller).await?;
    Ok(Json(stats::deadline_report(&tasks, Utc::now())))
}
