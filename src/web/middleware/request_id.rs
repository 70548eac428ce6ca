//! # Request ID Middleware
//!
//! Generates one id per request and threads it through three places: the
//! request extensions (for handlers), a tracing span wrapping downstream
//! processing (for log correlation), and the `x-request-id` response
//! header (for clients reporting problems).

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Request ID wrapper for extension storage
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Get the request ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attach a fresh request id to the request, the logs, and the response.
///
/// Downstream handling runs inside a span that carries the id, so every
/// log line emitted while the request is in flight correlates with the
/// `x-request-id` header the client receives.
pub async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4().to_string());
    request.extensions_mut().insert(request_id.clone());

    let span = info_span!("http_request", request_id = %request_id.as_str());
    let mut response = next.run(request).instrument(span).await;

    // A hyphenated UUID is always a valid header value.
    response
        .headers_mut()
        .insert("x-request-id", request_id.as_str().parse().unwrap());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use axum::{Extension, Router};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(add_request_id));

        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers().get("x-request-id").unwrap();
        let value = header.to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[tokio::test]
    async fn test_handlers_see_the_same_id_as_the_response_header() {
        let app = Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move {
                    id.as_str().to_string()
                }),
            )
            .layer(axum::middleware::from_fn(add_request_id));

        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), header);
    }
}
