//! BoothPlan Server
//!
//! Persistence gateway and read-only public viewer for show floor plans.
//!
//! ## Routes
//!
//! ```text
//! GET  /health
//! GET  /shows/{show_id}/floorplan          load (defaults when never saved)
//! PUT  /shows/{show_id}/floorplan          save the whole document
//! POST /shows/{show_id}/background         raw image bytes -> { reference, width, height }
//! GET  /shows/{show_id}/vendors            vendor directory
//! GET  /shows/{show_id}/public?role=&paid= gated public render + legend
//! GET  /shows/{show_id}/public.svg         same, as SVG
//! GET  /images/{reference}                 uploaded background
//! ```

mod config;
mod error;
mod gate;
mod routes;

use axum::extract::DefaultBodyLimit;
use boothplan_core::PersistenceGateway;
use boothplan_core::storage::{FileImageStore, FileStorage};
use boothplan_core::vendor::FileVendorDirectory;
use config::ServerConfig;
use gate::DatePaymentGate;
use routes::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boothplan_server=info,boothplan_core=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let gateway = PersistenceGateway::new(
        Arc::new(FileStorage::new(config.plans_dir())?),
        Arc::new(FileImageStore::new(config.images_dir())?),
        Arc::new(FileVendorDirectory::new(config.vendors_dir())),
    );
    let state = AppState::new(gateway, Arc::new(DatePaymentGate));

    let app = routes::router(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("BoothPlan server listening on {}", config.addr);
    info!("Data directory: {}", config.data_dir.display());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
