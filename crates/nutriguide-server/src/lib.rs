//! NutriGuide Server
//!
//! JSON-over-HTTP surface for the resolution engine: ingredient
//! compatibility, multi-condition guides, and source auditing.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use nutriguide_domain::traits::EntityCatalog;
use nutriguide_engine::Engine;
use nutriguide_store::{SeedDocument, SqliteStore, StoreError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened or seeded
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Open the store named by the config and wrap it in an engine
///
/// When a seed file is configured and the catalog holds no entities yet, the
/// seed is imported before the engine is built.
pub fn build_engine(config: &ServerConfig) -> Result<Engine<SqliteStore>, ServerError> {
    let store = SqliteStore::new(&config.database_path)?;

    if let Some(seed_path) = &config.seed_path {
        let stats = store.stats()?;
        if stats.ingredients == 0 && stats.conditions == 0 {
            info!("Importing seed from {}", seed_path.display());
            let doc = SeedDocument::from_file(seed_path)?;
            store.import_seed(&doc)?;
        } else {
            info!("Catalog already populated, skipping seed import");
        }
    }

    Ok(Engine::new(store, config.engine.clone()))
}

/// Start the HTTP server
///
/// Installs the tracing subscriber, opens (and optionally seeds) the store,
/// and serves the axum router until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;

    info!("Starting NutriGuide server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);
    info!(
        "Store timeout: {} ms, max conditions: {}",
        config.engine.store_timeout_ms, config.engine.max_conditions
    );

    let engine = build_engine(&config)?;
    let stats = engine.stats().await.map_err(|e| ServerError::Server(e.to_string()))?;
    info!(
        "Catalog: {} ingredients, {} conditions, {} interactions, {} sources",
        stats.ingredients, stats.conditions, stats.interactions, stats.sources
    );

    let state = AppState {
        engine: Arc::new(engine),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
