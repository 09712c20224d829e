//! HTTP routes for the catalog service.
//!
//! Defines the Axum router, the shared application state, and the explicit
//! middleware composition order. Authentication pieces are constructed at
//! the composition root and injected, never reached for globally.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_metrics_middleware, origin_guard, require_auth, AuthState, OriginState};
use crate::repositories::MovieCatalog;
use auth_core::{AuthEngine, AuthPolicy, JwksCache, JwksFetcher, KeyResolver, OriginGuard};
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Global request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// The movie lookup capability handlers delegate to.
    pub catalog: Arc<dyn MovieCatalog>,
}

/// Build the authentication engine from configuration.
///
/// The JWKS cache, fetcher, and resolver are constructed here - one
/// instance per engine - so tests can build isolated engines with their own
/// caches.
#[must_use]
pub fn build_auth_engine(config: &Config) -> AuthEngine {
    let cache = Arc::new(JwksCache::with_limits(
        Duration::from_secs(config.jwks_cache_ttl_seconds),
        config.jwks_cache_capacity,
    ));
    let fetcher = Arc::new(JwksFetcher::new(config.environment));
    let resolver = KeyResolver::new(cache, fetcher);

    let mut policy = AuthPolicy::new(config.environment);
    policy.default_algorithm = config.jwt_default_algorithm.clone();
    policy.allowed_algorithms = config.jwt_allowed_algorithms.clone();
    policy.static_secret = config.jwt_secret.clone();
    policy.excluded_paths = config.auth_excluded_paths.clone();

    AuthEngine::new(policy, resolver)
}

/// Build the origin guard from configuration.
#[must_use]
pub fn build_origin_guard(config: &Config) -> OriginGuard {
    OriginGuard::new(config.allowed_hosts.clone())
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/`, `/docs` - service descriptors - public
/// - `/health`, `/ready` - probes - public
/// - `/metrics` - Prometheus endpoint - public
/// - `/api/v1/...` - movie and tool endpoints - authenticated
///
/// Layer order (bottom-to-top execution):
/// 1. TimeoutLayer - bound the request (innermost)
/// 2. TraceLayer - log request details
/// 3. origin_guard - validate the Origin header
/// 4. http_metrics_middleware - record ALL responses (outermost)
pub fn build_routes(
    state: Arc<AppState>,
    engine: Arc<AuthEngine>,
    guard: Arc<OriginGuard>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let auth_state = Arc::new(AuthState { engine });
    let origin_state = Arc::new(OriginState { guard });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::service_root))
        .route("/docs", get(handlers::service_docs))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required unless disabled)
    let mut protected_routes = Router::new()
        .route("/api/v1/me", get(handlers::get_me))
        .route("/api/v1/movies", get(handlers::list_movies))
        .route("/api/v1/movies/top-rated", get(handlers::top_rated_movies))
        .route(
            "/api/v1/movies/by-genre/:genre",
            get(handlers::movies_by_genre),
        )
        .route(
            "/api/v1/movies/by-rating/:rating",
            get(handlers::movies_by_rating),
        )
        .route("/api/v1/movies/:id", get(handlers::get_movie))
        .route("/api/v1/movies/:id/similar", get(handlers::similar_movies))
        .route("/api/v1/movies/:id/reviews", get(handlers::movie_reviews))
        .route("/api/v1/tools/suggest-movie", get(handlers::suggest_movie))
        .route("/api/v1/tools/top-movies", get(handlers::top_movies))
        .route("/api/v1/tools/search-movies", get(handlers::search_movies));

    if state.config.enable_auth {
        protected_routes =
            protected_routes.route_layer(middleware::from_fn_with_state(auth_state, require_auth));
    } else {
        tracing::warn!(target: "catalog.routes", "Authentication middleware is DISABLED");
    }

    let protected_routes = protected_routes.with_state(state);

    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(middleware::from_fn_with_state(origin_state, origin_guard))
        // HTTP metrics layer (outermost) - captures ALL responses including
        // framework-level errors like 400, 404, 405
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_app_state_is_clone() {
        // Required for Axum's State extractor
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_build_auth_engine_uses_config_policy() {
        let vars = HashMap::from([
            ("APP_ENV".to_string(), "prod".to_string()),
            ("JWT_ALLOWED_ALGORITHMS".to_string(), "RS256".to_string()),
        ]);
        let config = Config::from_vars(&vars).unwrap();
        let engine = build_auth_engine(&config);
        assert!(engine.environment().is_prod());
    }
}
