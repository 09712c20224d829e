//! HTTP metrics middleware for capturing all request/response metrics.
//!
//! Applied as the outermost layer so it also sees framework-level errors
//! that never reach a handler (404, 405, 400 parse failures).

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Middleware that records method, normalized path, status code, and
/// duration for every response.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status_code = response.status().as_u16();
    record_http_request(&method, &path, status_code, duration);

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn handler_200() -> &'static str {
        "OK"
    }

    fn test_app() -> Router {
        Router::new()
            .route("/success", get(handler_200))
            .layer(middleware::from_fn(http_metrics_middleware))
    }

    #[tokio::test]
    async fn test_middleware_passes_responses_through() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/success")
                    .body(Body::empty())
                    .expect("request builder should succeed"),
            )
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_records_not_found() {
        let response = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .expect("request builder should succeed"),
            )
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        // The 404 is recorded by the middleware
    }
}
