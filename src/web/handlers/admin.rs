//! # Admin Handlers
//!
//! User administration surface. Restricted to admin callers; a regular
//! user gets 403 here rather than 404 because the route itself is not a
//! secret.

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::access::Caller;
use crate::models::UserSummary;
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

/// List all users with their task counts: GET /admin/users
///
/// Users who own no tasks appear with a count of zero.
pub async fn list_users(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<Vec<UserSummary>>> {
    caller.require_admin()?;

    info!(admin_id = caller.user_id, "Listing users");
    let users = state.store.list_users_with_counts().await?;
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use crate::web::errors::ApiError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_regular_caller_is_rejected() {
        let store = MemoryStore::new();
        let user = store.add_user("ada", "ada@example.com", Role::Regular, "tok");
        let state = AppState::with_store(AppConfig::default(), Arc::new(store));

        let err = list_users(State(state), Caller::from_user(&user))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthorizationError { .. }));
    }

    #[tokio::test]
    async fn test_admin_sees_every_user() {
        let store = MemoryStore::new();
        let admin = store.add_user("root", "root@example.com", Role::Admin, "admin-tok");
        store.add_user("ada", "ada@example.com", Role::Regular, "tok");
        let state = AppState::with_store(AppConfig::default(), Arc::new(store));

        let Json(users) = list_users(State(state), Caller::from_user(&admin))
            .await
            .unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|summary| summary.tasks_count == 0));
    }
}
