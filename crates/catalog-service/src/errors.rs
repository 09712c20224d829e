//! Catalog service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Bodies
//! carry a single `detail` field, matching the error contract of the API.
//! Internal errors return a generic message to clients; the actual cause is
//! logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Catalog service error type.
///
/// Maps to HTTP status codes:
/// - Unauthorized: 401 (with WWW-Authenticate header)
/// - OriginRejected: 403
/// - NotFound: 404
/// - BadRequest: 400
/// - Internal: 500
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Origin rejected: {0}")]
    OriginRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl CatalogError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Unauthorized(_) => 401,
            CatalogError::OriginRejected(_) => 403,
            CatalogError::NotFound(_) => 404,
            CatalogError::BadRequest(_) => 400,
            CatalogError::Internal(_) => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            CatalogError::Unauthorized(detail) => (StatusCode::UNAUTHORIZED, detail.clone()),
            CatalogError::OriginRejected(detail) => (StatusCode::FORBIDDEN, detail.clone()),
            CatalogError::NotFound(detail) => (StatusCode::NOT_FOUND, detail.clone()),
            CatalogError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            CatalogError::Internal(cause) => {
                // Log actual error server-side, return generic message
                tracing::error!(target: "catalog.http", error = %cause, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut response = (status, Json(ErrorBody { detail })).into_response();

        // Challenge header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"marquee-api\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CatalogError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(CatalogError::OriginRejected("x".into()).status_code(), 403);
        assert_eq!(CatalogError::NotFound("x".into()).status_code(), 404);
        assert_eq!(CatalogError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(CatalogError::Internal("x".into()).status_code(), 500);
    }

    #[tokio::test]
    async fn test_unauthorized_response_has_challenge_header() {
        let response = CatalogError::Unauthorized("token has expired".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let www_auth = response
            .headers()
            .get("WWW-Authenticate")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(www_auth.contains("Bearer realm=\"marquee-api\""));

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["detail"], "token has expired");
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let response = CatalogError::NotFound("Movie not found: m42".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["detail"], "Movie not found: m42");
    }

    #[tokio::test]
    async fn test_internal_response_is_generic() {
        let response =
            CatalogError::Internal("catalog file vanished mid-flight".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["detail"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_origin_rejection_is_forbidden() {
        let response =
            CatalogError::OriginRejected("private addresses are not allowed".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["detail"], "private addresses are not allowed");
    }
}
