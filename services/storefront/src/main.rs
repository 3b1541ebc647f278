use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod blob_store;
mod checkout;
mod config;
mod error;
mod models;
mod password;
mod repositories;
mod routes;
mod state;
#[cfg(test)]
mod testing;
mod validation;

use common::database::{self, DatabaseConfig, init_pool};
use tokio::net::TcpListener;

use crate::{
    blob_store::S3BlobStore,
    config::Settings,
    repositories::{AccountRepository, ImageRepository, OrderRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting storefront service");

    let settings = Settings::from_env()?;
    info!("Loaded settings: {:?}", settings);

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    database::health_check(&pool).await?;
    info!("Database connection successful");

    database::run_migrations(&pool).await?;

    let blob_store = S3BlobStore::from_settings(&settings).await;

    let app_state = AppState {
        account_store: Arc::new(AccountRepository::new(pool.clone())),
        image_store: Arc::new(ImageRepository::new(pool.clone())),
        order_store: Arc::new(OrderRepository::new(pool.clone())),
        blob_store: Arc::new(blob_store),
    };

    // Start the web server
    let app = routes::create_router(app_state, settings.max_body_bytes);

    let addr = format!("0.0.0.0:{}", settings.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Storefront service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Storefront service stopped");

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
