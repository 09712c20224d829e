//! Shared helpers for catalog-service integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use catalog_service::config::Config;
use catalog_service::repositories::JsonFileCatalog;
use catalog_service::routes::{build_auth_engine, build_origin_guard, build_routes, AppState};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;

/// Static secret used by test configurations.
pub const TEST_SECRET: &str = "integration-test-secret";

/// 2100-01-01, safely unexpired.
pub const FAR_FUTURE: i64 = 4_102_444_800;

/// Global metrics handle shared by all tests in one binary; the recorder can
/// only be installed once per process.
static TEST_METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub fn test_metrics_handle() -> PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            catalog_service::observability::init_metrics_recorder().unwrap_or_else(|_| {
                metrics_exporter_prometheus::PrometheusBuilder::new()
                    .build_recorder()
                    .handle()
            })
        })
        .clone()
}

/// Path to the checked-in movie fixture.
pub fn fixture_path() -> String {
    format!("{}/data/movies.json", env!("CARGO_MANIFEST_DIR"))
}

/// Config over the fixture catalog with a static secret, plus overrides.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("JWT_SECRET".to_string(), TEST_SECRET.to_string()),
        ("MOVIE_DATA_PATH".to_string(), fixture_path()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    Config::from_vars(&vars).expect("test config should load")
}

/// Build the full router over the fixture catalog.
pub fn test_app(config: Config) -> Router {
    let catalog =
        JsonFileCatalog::from_file(config.movie_data_path.clone()).expect("fixture should load");
    let engine = Arc::new(build_auth_engine(&config));
    let guard = Arc::new(build_origin_guard(&config));
    let state = Arc::new(AppState {
        config,
        catalog: Arc::new(catalog),
    });
    build_routes(state, engine, guard, test_metrics_handle())
}

/// Mint an HS256 token signed with [`TEST_SECRET`].
pub fn mint_token(sub: &str, exp: i64) -> String {
    mint_token_with_secret(sub, exp, TEST_SECRET)
}

/// Mint an HS256 token with an arbitrary secret.
pub fn mint_token_with_secret(sub: &str, exp: i64, secret: &str) -> String {
    let claims = serde_json::json!({"sub": sub, "exp": exp, "role": "viewer"});
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token should mint")
}

/// Issue one GET request against the router.
pub async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::empty()).expect("request should build"))
        .await
        .expect("request should not error")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
