//! # Access Control
//!
//! The resolved acting identity and the single visibility predicate every
//! store operation applies. The auth middleware builds a [`Caller`] from the
//! bearer credential (or the disabled-auth placeholder) and inserts it into
//! request extensions; handlers recover it through the axum extractor.

use crate::models::{Role, Task, User};
use crate::web::errors::ApiError;

/// How the request was authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Authenticated via a bearer API token resolved to a user.
    Token,
    /// Authentication is disabled; all requests are allowed.
    Disabled,
}

/// The acting identity attached to each request by the auth middleware.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: i64,
    pub nickname: String,
    pub role: Role,
    pub auth_method: AuthMethod,
}

impl Caller {
    /// Build a caller from a resolved user account.
    pub fn from_user(user: &User) -> Self {
        Caller {
            user_id: user.id,
            nickname: user.nickname.clone(),
            role: user.role,
            auth_method: AuthMethod::Token,
        }
    }

    /// The identity used when authentication is disabled: an anonymous
    /// admin-equivalent caller, so every task is visible and mutable.
    pub fn disabled() -> Self {
        Caller {
            user_id: 0,
            nickname: "anonymous".to_string(),
            role: Role::Admin,
            auth_method: AuthMethod::Disabled,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The visibility predicate: admins see everything, regular users see
    /// only tasks they own. Mutation is restricted identically, so this is
    /// the one place the ownership rule lives.
    pub fn can_view(&self, task: &Task) -> bool {
        self.is_admin() || task.owner_id == self.user_id
    }

    /// Gate for admin-only capabilities (user listing).
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::authorization_error(
                "This operation requires the admin role",
            ))
        }
    }
}

/// Axum extractor recovering the caller injected by the auth middleware.
///
/// The middleware always inserts a caller (the disabled one when auth is
/// off), so a missing extension means the route bypassed the middleware.
impl<S> axum::extract::FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Caller>().cloned().ok_or_else(|| {
            ApiError::auth_error("Caller not resolved - auth middleware may not have run")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskDraft;
    use chrono::{Duration, Utc};

    fn caller(user_id: i64, role: Role) -> Caller {
        Caller {
            user_id,
            nickname: format!("user-{user_id}"),
            role,
            auth_method: AuthMethod::Token,
        }
    }

    fn task_owned_by(owner_id: i64) -> Task {
        Task::from_draft(
            1,
            owner_id,
            TaskDraft {
                title: "plan sprint".to_string(),
                description: None,
                is_important: true,
                deadline_at: Utc::now() + Duration::days(7),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_regular_user_sees_only_owned_tasks() {
        let alice = caller(1, Role::Regular);
        assert!(alice.can_view(&task_owned_by(1)));
        assert!(!alice.can_view(&task_owned_by(2)));
    }

    #[test]
    fn test_admin_sees_all_tasks() {
        let admin = caller(9, Role::Admin);
        assert!(admin.can_view(&task_owned_by(1)));
        assert!(admin.can_view(&task_owned_by(2)));
    }

    #[test]
    fn test_require_admin() {
        assert!(caller(9, Role::Admin).require_admin().is_ok());
        assert!(caller(1, Role::Regular).require_admin().is_err());
    }

    #[test]
    fn test_disabled_caller_is_admin_equivalent() {
        let anonymous = Caller::disabled();
        assert_eq!(anonymous.auth_method, AuthMethod::Disabled);
        assert!(anonymous.can_view(&task_owned_by(42)));
        assert!(anonymous.require_admin().is_ok());
    }
}
