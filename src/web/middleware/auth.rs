//! # Authentication Middleware
//!
//! Bearer-token authentication for the protected routes. Tokens are opaque
//! strings provisioned out of band and resolved against the user store; the
//! resolved [`Caller`] is inserted into request extensions for handlers.
//!
//! With authentication disabled every request runs as an anonymous
//! admin-equivalent caller, which keeps local development friction-free.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::access::Caller;
use crate::web::errors::ApiError;
use crate::web::state::AppState;

/// Authentication middleware for protected endpoints
///
/// Applied selectively to the task, stats, and admin routes. Resolves the
/// bearer token to a user and stores the caller identity in request
/// extensions; role checks happen in the handlers.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Auth disabled: run as the anonymous caller.
    if !state.config.auth.enabled {
        debug!("Authentication disabled - continuing as anonymous caller");
        request.extensions_mut().insert(Caller::disabled());
        return Ok(next.run(request).await);
    }

    // Extract Authorization header
    let auth_header = request
        .headers()
        .get("authorization")
        .ok_or_else(|| ApiError::auth_error("Missing authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::auth_error("Invalid authorization header format"))?;

    // Extract Bearer token
    let token = extract_bearer_token(auth_str)?;

    let user = state
        .store
        .find_user_by_token(token)
        .await?
        .ok_or_else(|| {
            warn!("Rejected request with unknown API token");
            ApiError::auth_error("Invalid or unknown API token")
        })?;

    debug!(
        user_id = user.id,
        nickname = %user.nickname,
        role = %user.role,
        "Authenticated request"
    );

    // Add caller identity to request extensions for handlers to access
    request.extensions_mut().insert(Caller::from_user(&user));

    Ok(next.run(request).await)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Result<&str, ApiError> {
    if !auth_header.starts_with("Bearer ") {
        return Err(ApiError::auth_error(
            "Authorization header must use Bearer scheme",
        ));
    }

    let token = &auth_header[7..]; // Skip "Bearer " prefix
    if token.is_empty() {
        return Err(ApiError::auth_error("Empty Bearer token"));
    }

    Ok(token)
}
