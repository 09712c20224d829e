//! Metrics definitions for the catalog service.
//!
//! Prometheus naming conventions: `catalog_` prefix, `_total` for counters,
//! `_seconds` for duration histograms.
//!
//! # Cardinality
//!
//! Endpoint labels are normalized to the route templates below; unknown
//! paths collapse into `/other` so label cardinality stays bounded.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle for
/// serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if the recorder fails to install (e.g., already
/// installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("catalog_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record HTTP request completion.
///
/// Metric: `catalog_http_requests_total`,
/// `catalog_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("catalog_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("catalog_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout.
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/ready" | "/metrics" | "/docs" | "/api/v1/me" | "/api/v1/movies"
        | "/api/v1/movies/top-rated" | "/api/v1/tools/suggest-movie"
        | "/api/v1/tools/top-movies" | "/api/v1/tools/search-movies" => path.to_string(),
        _ => normalize_dynamic_endpoint(path),
    }
}

/// Normalize paths with dynamic segments.
fn normalize_dynamic_endpoint(path: &str) -> String {
    if path.starts_with("/api/v1/movies/by-genre/") {
        return "/api/v1/movies/by-genre/{genre}".to_string();
    }
    if path.starts_with("/api/v1/movies/by-rating/") {
        return "/api/v1/movies/by-rating/{rating}".to_string();
    }

    if path.starts_with("/api/v1/movies/") {
        let parts: Vec<&str> = path.split('/').collect();

        // /api/v1/movies/{id}
        if parts.len() == 5 {
            return "/api/v1/movies/{id}".to_string();
        }

        // /api/v1/movies/{id}/similar and /api/v1/movies/{id}/reviews
        if parts.len() == 6 {
            if let Some(action) = parts.get(5) {
                if *action == "similar" {
                    return "/api/v1/movies/{id}/similar".to_string();
                }
                if *action == "reviews" {
                    return "/api/v1/movies/{id}/reviews".to_string();
                }
            }
        }
    }

    // Unknown paths normalized to "/other" to bound cardinality
    "/other".to_string()
}
