//! Service descriptor endpoints.
//!
//! `/` and `/docs` are on the auth exclusion list so monitoring and humans
//! can discover the service without a token.

use axum::Json;
use serde::Serialize;

/// Response for the root endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub message: &'static str,
    pub docs: &'static str,
}

/// Handler for GET /
pub async fn service_root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "marquee-catalog",
        version: env!("CARGO_PKG_VERSION"),
        message: "Marquee catalog service running",
        docs: "/docs",
    })
}

/// Endpoint summary for GET /docs.
#[derive(Debug, Clone, Serialize)]
pub struct DocsResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Handler for GET /docs - a compact endpoint listing.
pub async fn service_docs() -> Json<DocsResponse> {
    Json(DocsResponse {
        name: "marquee-catalog",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /health",
            "GET /ready",
            "GET /metrics",
            "GET /api/v1/me",
            "GET /api/v1/movies?search=",
            "GET /api/v1/movies/top-rated?limit=",
            "GET /api/v1/movies/by-genre/{genre}",
            "GET /api/v1/movies/by-rating/{rating}",
            "GET /api/v1/movies/{id}",
            "GET /api/v1/movies/{id}/similar?limit=",
            "GET /api/v1/movies/{id}/reviews",
            "GET /api/v1/tools/suggest-movie?genre=",
            "GET /api/v1/tools/top-movies?rating=",
            "GET /api/v1/tools/search-movies?query=",
        ],
    })
}
