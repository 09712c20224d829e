//! Health check handlers.
//!
//! - `/health`: Liveness probe - returns OK if the process is running
//! - `/ready`: Readiness probe - reports catalog and auth state

use crate::models::ReadinessResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness probe handler.
///
/// Returns a simple "OK" to indicate the process is running. Does NOT check
/// dependencies - failure means the process is hung.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe handler.
///
/// The catalog is loaded at startup and held in memory, so readiness is
/// mostly a sanity report: entry count and whether auth is enabled. An empty
/// catalog answers 503 - it means the data file was empty or replaced.
#[tracing::instrument(skip_all, name = "catalog.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog_entries = state.catalog.list_all().await.len();

    if catalog_entries == 0 {
        tracing::warn!(target: "catalog.health", "Readiness check failed: catalog is empty");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                catalog_entries: Some(0),
                auth_enabled: state.config.enable_auth,
                error: Some("Catalog has no entries".to_string()),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready",
            catalog_entries: Some(catalog_entries),
            auth_enabled: state.config.enable_auth,
            error: None,
        }),
    )
}
