//! Current user handler.
//!
//! Echoes the authenticated claims from the JWT back to the caller, the way
//! the rest of the API sees them.

use auth_core::Claims;
use axum::{Extension, Json};
use serde::Serialize;
use tracing::instrument;

/// Response for `/api/v1/me`.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    /// The full verified claims payload.
    pub user: Claims,
}

/// Handler for GET /api/v1/me
///
/// Requires valid authentication via the auth middleware; the claims
/// extension is always present here.
#[instrument(skip_all, name = "catalog.handlers.me")]
pub async fn get_me(Extension(claims): Extension<Claims>) -> Json<MeResponse> {
    tracing::debug!(target: "catalog.handlers.me", "Returning user claims");
    Json(MeResponse { user: claims })
}
