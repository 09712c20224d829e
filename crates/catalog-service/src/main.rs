//! Catalog Service
//!
//! Entry point for the Marquee movie catalog service: REST movie endpoints
//! plus human-readable tool endpoints, behind JWT authentication.

use catalog_service::config::Config;
use catalog_service::observability::init_metrics_recorder;
use catalog_service::repositories::JsonFileCatalog;
use catalog_service::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,auth_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting catalog service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        environment = %config.environment,
        bind_address = %config.bind_address,
        auth_enabled = config.enable_auth,
        jwks_cache_ttl_seconds = config.jwks_cache_ttl_seconds,
        "Configuration loaded successfully"
    );

    if config.enable_auth && config.jwt_secret.is_none() {
        warn!("No static JWT secret configured; only jku-bearing tokens can verify");
    }

    // Load the movie catalog
    let catalog = JsonFileCatalog::from_file(&config.movie_data_path).map_err(|e| {
        error!("Failed to load movie catalog: {}", e);
        e
    })?;
    info!(movie_count = catalog.len(), "Movie catalog ready");

    // Initialize metrics recorder
    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        anyhow::anyhow!(e)
    })?;

    // Composition root: construct and inject the auth pieces explicitly
    let engine = Arc::new(routes::build_auth_engine(&config));
    let guard = Arc::new(routes::build_origin_guard(&config));

    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState {
        config,
        catalog: Arc::new(catalog),
    });

    // Build application routes
    let app = routes::build_routes(state, engine, guard, metrics_handle);

    // Parse bind address
    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Catalog service listening on {}", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Catalog service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received and the drain period ends.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    // Graceful shutdown drain period
    let drain_secs: u64 = std::env::var("CATALOG_DRAIN_SECONDS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    if drain_secs > 0 {
        warn!("Draining connections for {} seconds...", drain_secs);
        tokio::time::sleep(Duration::from_secs(drain_secs)).await;
        info!("Drain period complete");
    }
}
