//! Origin validation middleware.
//!
//! Runs independently of authentication, across all routes. Requests with a
//! rejected Origin header answer 403 before any handler runs.

use crate::errors::CatalogError;
use auth_core::OriginGuard;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the origin middleware.
#[derive(Clone)]
pub struct OriginState {
    /// The origin guard, shared across requests.
    pub guard: Arc<OriginGuard>,
}

/// Middleware validating the Origin header against the configured guard.
#[instrument(skip_all, name = "catalog.middleware.origin")]
pub async fn origin_guard(
    State(state): State<Arc<OriginState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, CatalogError> {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string);

    if let Err(error) = state.guard.validate(origin.as_deref()).await {
        tracing::warn!(
            target: "catalog.middleware.origin",
            error = %error,
            "Origin rejected"
        );
        return Err(CatalogError::OriginRejected(error.to_string()));
    }

    Ok(next.run(req).await)
}
