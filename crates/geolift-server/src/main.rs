//! GeoLift Server - Main entry point

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use geolift_common::logging::{init_logging, LogConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing::info;

use geolift_server::{
    config::Config,
    features,
    geoserver::GeoServerClient,
    ingest::{ArchiveStager, LayerPublisher, OgrTool, PgCatalog, UnzipTool, UploadPipeline},
    middleware,
};

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    db: sqlx::PgPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging configuration comes from the environment; defaults are
    // console output at info level.
    let log_config = LogConfig::from_env()?;
    init_logging(&log_config)?;

    info!("Starting GeoLift Server");

    let config = Config::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&config.database.url())
        .await?;

    info!("PostGIS connection pool ready");

    // The scratch directory must exist before the first upload stages.
    tokio::fs::create_dir_all(&config.ingest.scratch_dir).await?;

    let pipeline = build_pipeline(&config, db_pool.clone())?;
    info!("Ingestion pipeline wired");

    let state = AppState { db: db_pool };
    let app = create_router(state, pipeline, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Wire the production pipeline: external unzip and ogr2ogr, the live
/// schema catalog, and the GeoServer REST client.
fn build_pipeline(config: &Config, db_pool: sqlx::PgPool) -> Result<Arc<UploadPipeline>> {
    let stager = ArchiveStager::new(config.ingest.scratch_dir.clone());
    let decompressor = Arc::new(UnzipTool::new(config.ingest.unzip_program.clone()));
    let converter = Arc::new(OgrTool::new(&config.ingest, &config.database));
    let catalog = Arc::new(PgCatalog::new(db_pool));
    let client = GeoServerClient::new(config.geoserver.clone())?;
    let publisher = LayerPublisher::new(client, config.ingest.target_srs.clone());

    Ok(Arc::new(UploadPipeline::new(
        stager,
        decompressor,
        converter,
        catalog,
        publisher,
    )))
}

/// Create the application router with all routes and middleware
fn create_router(state: AppState, pipeline: Arc<UploadPipeline>, config: &Config) -> Router {
    let feature_state = features::FeatureState { pipeline };
    let feature_routes = features::router(feature_state);

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .merge(feature_routes)
        // Layers apply innermost to outermost
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> Result<Response, StatusCode> {
    if let Err(e) = sqlx::query("SELECT 1").fetch_one(&state.db).await {
        tracing::error!("Database health check failed: {e:?}");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "database": "connected"
        })),
    )
        .into_response())
}

/// Resolve once the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }

    // In-flight uploads get a short grace period to finish staging cleanup
    let grace = timeout_secs.min(5);
    info!("Waiting up to {grace} seconds for open connections");
    tokio::time::sleep(Duration::from_secs(grace)).await;
}
