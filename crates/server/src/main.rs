mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presto_core::{
    load_config, validate_config, CacheStore, CatalogSource, CinemetaClient, DebridClient,
    RealDebridClient, Searcher, StreamResolver, TorrentioClient,
};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("PRESTO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Resolver limits: torrent_limit={}, max_concurrency={}, max_streams={}",
        config.resolver.torrent_limit,
        config.resolver.max_concurrency,
        config.resolver.max_streams
    );

    // Create the three-tier cache
    let cache = Arc::new(CacheStore::new(&config.cache));
    info!(
        "Cache TTLs: metadata={}s, search={}s, streams={}s",
        config.cache.metadata_ttl_secs, config.cache.search_ttl_secs, config.cache.stream_ttl_secs
    );

    // Create external service clients
    let catalog: Arc<dyn CatalogSource> = Arc::new(CinemetaClient::new(config.catalog.clone()));
    info!("Catalog client initialized");

    let searcher: Arc<dyn Searcher> = Arc::new(TorrentioClient::new(config.searcher.clone()));
    info!("Aggregator client initialized");

    let debrid: Arc<dyn DebridClient> = Arc::new(
        RealDebridClient::new(config.debrid.clone())
            .context("Failed to create debrid client")?,
    );
    info!("Debrid client initialized");

    // Create the resolution pipeline
    let resolver = Arc::new(StreamResolver::new(
        catalog,
        searcher,
        debrid,
        Arc::clone(&cache),
        config.resolver.clone(),
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), resolver, cache));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
