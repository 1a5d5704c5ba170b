mod bootstrap;
mod candidates;
mod config;
mod db;
mod errors;
mod export;
mod ingest;
mod jobs;
mod models;
mod persistence;
mod routes;
mod state;
mod store;
mod uploads;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::ingest::CsvSource;
use crate::persistence::{
    MemorySnapshotStore, PersistenceGateway, SnapshotStore, SqliteSnapshotStore,
};
use crate::routes::build_router;
use crate::state::AppState;
use crate::uploads::SimulatedExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    // Snapshot backend: SQLite when configured, otherwise process memory
    let backend: Arc<dyn SnapshotStore> = match &config.database_url {
        Some(url) => Arc::new(SqliteSnapshotStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; snapshots will not survive a restart");
            Arc::new(MemorySnapshotStore::default())
        }
    };
    let gateway = PersistenceGateway::new(backend);

    let http = reqwest::Client::new();
    let csv_source = CsvSource::from_location(&config.candidates_csv);
    let stores =
        bootstrap::hydrate(gateway, &csv_source, &http, &config.resume_assets_path).await?;

    let state = AppState::new(stores, Arc::new(SimulatedExtractor), &config);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
