//! # Task Management Handlers
//!
//! HTTP handlers for the task surface: CRUD, quadrant and status filters,
//! due-today listing, substring search, and completion. Every handler runs
//! behind the auth middleware and receives the resolved [`Caller`]; the
//! store applies the caller's visibility, so a foreign task id answers 404
//! here rather than 403.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::Caller;
use crate::models::{DeletedTask, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::quadrant::{self, Quadrant};
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Minimum length of a search query, in characters.
const SEARCH_MIN_CHARS: usize = 2;

/// Task representation returned by every task endpoint.
///
/// Extends the stored record with `days_left`, the floored number of whole
/// days until the deadline. Negative once the deadline has passed.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_important: bool,
    pub deadline_at: DateTime<Utc>,
    pub quadrant: Quadrant,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
    pub days_left: i64,
}

impl TaskResponse {
    pub fn from_task(task: Task, now: DateTime<Utc>) -> Self {
        let days_left = quadrant::days_remaining(task.deadline_at, now);
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_important: task.is_important,
            deadline_at: task.deadline_at,
            quadrant: task.quadrant,
            completed: task.completed,
            created_at: task.created_at,
            completed_at: task.completed_at,
            owner_id: task.owner_id,
            days_left,
        }
    }
}

/// Response for successful task deletion
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub deleted: DeletedTask,
}

/// Query parameters for task search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn to_responses(tasks: Vec<Task>) -> Vec<TaskResponse> {
    let now = Utc::now();
    tasks
        .into_iter()
        .map(|task| TaskResponse::from_task(task, now))
        .collect()
}

/// List visible tasks: GET /tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    debug!(user_id = caller.user_id, "Listing tasks");
    let tasks = state.store.list_tasks(&caller).await?;
    Ok(Json(to_responses(tasks)))
}

/// Fetch a single task: GET /tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskResponse>> {
    debug!(user_id = caller.user_id, task_id = id, "Fetching task");
    let task = state.store.get_task(&caller, id).await?;
    Ok(Json(TaskResponse::from_task(task, Utc::now())))
}

/// List tasks in one quadrant: GET /tasks/quadrant/{quadrant}
///
/// An unknown quadrant label is a client error; an empty quadrant is a
/// successful empty listing.
pub async fn tasks_by_quadrant(
    State(state): State<AppState>,
    caller: Caller,
    Path(label): Path<String>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let parsed: Quadrant = label
        .parse()
        .map_err(|e: quadrant::InvalidQuadrant| ApiError::bad_request(e.to_string()))?;

    debug!(user_id = caller.user_id, quadrant = %parsed, "Listing tasks by quadrant");
    let tasks = state.store.tasks_by_quadrant(&caller, parsed).await?;
    Ok(Json(to_responses(tasks)))
}

/// List tasks by completion status: GET /tasks/status/{status}
pub async fn tasks_by_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(label): Path<String>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let parsed: TaskStatus = label
        .parse()
        .map_err(|e: crate::models::task::InvalidStatus| ApiError::bad_request(e.to_string()))?;

    debug!(user_id = caller.user_id, status = %parsed, "Listing tasks by status");
    let tasks = state.store.tasks_by_status(&caller, parsed).await?;
    Ok(Json(to_responses(tasks)))
}

/// List tasks whose deadline falls today (UTC): GET /tasks/today
pub async fn tasks_due_today(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    debug!(user_id = caller.user_id, "Listing tasks due today");
    let tasks = state.store.tasks_due_today(&caller).await?;
    Ok(Json(to_responses(tasks)))
}

/// Case-insensitive substring search: GET /tasks/search?q=...
///
/// The query is trimmed before the length check, so whitespace padding
/// cannot smuggle a one-character search through.
pub async fn search_tasks(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let needle = params.q.trim();
    if needle.chars().count() < SEARCH_MIN_CHARS {
        return Err(ApiError::bad_request(format!(
            "Search query must be at least {SEARCH_MIN_CHARS} characters"
        )));
    }

    debug!(user_id = caller.user_id, query = %needle, "Searching tasks");
    let tasks = state.store.search_tasks(&caller, needle).await?;
    Ok(Json(to_responses(tasks)))
}

/// Create a new task: POST /tasks
pub async fn create_task(
    State(state): State<AppState>,
    caller: Caller,
    Json(draft): Json<TaskDraft>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    draft
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let task = state.store.create_task(&caller, draft).await?;
    info!(
        user_id = caller.user_id,
        task_id = task.id,
        quadrant = %task.quadrant,
        "Created task"
    );
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse::from_task(task, Utc::now())),
    ))
}

/// Partially update a task: PUT /tasks/{id}
///
/// Only fields present in the body change. Touching importance or the
/// deadline reruns classification against the current clock.
pub async fn update_task(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<TaskResponse>> {
    patch
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let task = state.store.update_task(&caller, id, patch).await?;
    info!(
        user_id = caller.user_id,
        task_id = task.id,
        quadrant = %task.quadrant,
        "Updated task"
    );
    Ok(Json(TaskResponse::from_task(task, Utc::now())))
}

/// Mark a task completed: PATCH /tasks/{id}/complete
///
/// Completing an already-completed task is a no-op that answers 200 with
/// the unchanged record.
pub async fn complete_task(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.store.complete_task(&caller, id).await?;
    info!(user_id = caller.user_id, task_id = task.id, "Completed task");
    Ok(Json(TaskResponse::from_task(task, Utc::now())))
}

/// Delete a task: DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let deleted = state.store.delete_task(&caller, id).await?;
    info!(
        user_id = caller.user_id,
        task_id = deleted.id,
        title = %deleted.title,
        "Deleted task"
    );
    Ok(Json(DeleteTaskResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use std::sync::Arc;

    fn test_state() -> (AppState, Caller) {
        let store = MemoryStore::new();
        let user = store.add_user("ada", "ada@example.com", Role::Regular, "tok");
        let caller = Caller::from_user(&user);
        let state = AppState::with_store(AppConfig::default(), Arc::new(store));
        (state, caller)
    }

    #[test]
    fn test_task_response_days_left() {
        let now = Utc::now();
        let draft = TaskDraft {
            title: "days".to_string(),
            description: None,
            is_important: true,
            deadline_at: now + Duration::hours(36),
        };
        let task = Task::from_draft(1, 1, draft, now);

        let response = TaskResponse::from_task(task.clone(), now);
        assert_eq!(response.days_left, 1);

        let overdue = TaskResponse::from_task(task, now + Duration::days(5));
        assert!(overdue.days_left < 0);
    }

    #[tokio::test]
    async fn test_create_task_answers_created_with_quadrant() {
        let (state, caller) = test_state();
        let draft = TaskDraft {
            title: "triage".to_string(),
            description: None,
            is_important: true,
            deadline_at: Utc::now() + Duration::days(1),
        };

        let (status, Json(body)) = create_task(State(state), caller, Json(draft)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.quadrant, Quadrant::Q1);
        assert!(!body.completed);
    }

    #[tokio::test]
    async fn test_create_task_rejects_short_title() {
        let (state, caller) = test_state();
        let draft = TaskDraft {
            title: "ab".to_string(),
            description: None,
            is_important: true,
            deadline_at: Utc::now() + Duration::days(1),
        };

        let err = create_task(State(state), caller, Json(draft)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_search_rejects_short_query_after_trim() {
        let (state, caller) = test_state();
        let err = search_tasks(
            State(state),
            caller,
            Query(SearchQuery {
                q: "  a  ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_quadrant_label_must_be_exact() {
        let (state, caller) = test_state();
        let err = tasks_by_quadrant(State(state), caller, Path("q1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }
}
