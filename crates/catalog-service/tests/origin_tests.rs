//! Origin guard integration tests.
//!
//! The guard runs across all routes, including public ones, so these use
//! `/health` to isolate origin behavior from authentication.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use common::{body_json, get, test_app, test_config};

#[tokio::test]
async fn test_no_origin_header_is_allowed() {
    let app = test_app(test_config(&[]));
    let response = get(app, "/health", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_allow_listed_origin_is_allowed_without_resolution() {
    // trusted.example.com resolves nowhere; the allow-list must short-circuit
    let app = test_app(test_config(&[("ALLOWED_HOSTS", "trusted.example.com")]));
    let response = get(
        app,
        "/health",
        &[("origin", "https://trusted.example.com")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_loopback_origin_is_blocked() {
    let app = test_app(test_config(&[("ALLOWED_HOSTS", "trusted.example.com")]));
    let response = get(app, "/health", &[("origin", "http://127.0.0.1")]).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "private addresses are not allowed");
}

#[tokio::test]
async fn test_private_range_origin_is_blocked() {
    let app = test_app(test_config(&[("ALLOWED_HOSTS", "trusted.example.com")]));
    let response = get(app, "/health", &[("origin", "http://192.168.1.50:3000")]).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unresolvable_origin_is_rejected() {
    let app = test_app(test_config(&[("ALLOWED_HOSTS", "trusted.example.com")]));
    let response = get(
        app,
        "/health",
        &[("origin", "https://no-such-host.invalid")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Origin hostname could not be resolved");
}

#[tokio::test]
async fn test_garbage_origin_fails_closed() {
    let app = test_app(test_config(&[]));
    let response = get(app, "/health", &[("origin", "not a url")]).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "invalid Origin header");
}

#[tokio::test]
async fn test_origin_guard_applies_to_protected_routes_too() {
    let app = test_app(test_config(&[]));
    let response = get(app, "/api/v1/movies", &[("origin", "http://10.0.0.8")]).await;
    // Origin rejection wins before authentication is consulted
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
