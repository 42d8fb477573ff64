//! Content Hub Backend
//!
//! Authenticated content API: accounts with profile images, hotel
//! listings with photos, and private text notes.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: Business logic and ownership checks
//! - Repositories: Storage ports with PostgreSQL and in-memory adapters
//! - Uploads: Files on disk, served under `/uploads`

use anyhow::{Context, Result};
use content_hub_backend::{
    config::{self, StorageDriver},
    db,
    repositories::Repositories,
    routes,
    state::AppState,
    uploads::DiskUploadStore,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        driver = ?config.database.driver,
        "Starting Content Hub Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let repositories = match config.database.driver {
        StorageDriver::Postgres => {
            info!("Connecting to database...");
            let pool = db::connect(&config.database).await?;
            db::run_migrations(&pool).await?;
            Repositories::postgres(pool)
        }
        StorageDriver::Memory => {
            warn!("Using in-memory storage; all data is lost on shutdown");
            Repositories::in_memory()
        }
    };

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("cannot create upload directory {}", config.uploads.dir))?;
    let uploads = Arc::new(DiskUploadStore::new(&config.uploads.dir));
    info!(dir = %config.uploads.dir, "Serving uploads");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, repositories, uploads);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "content_hub_backend=info,tower_http=info".into()
        } else {
            "content_hub_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.jwt.secret.len() < 32 {
        errors.push("JWT secret must be at least 32 characters");
    }

    if config.database.driver == StorageDriver::Memory {
        errors.push("in-memory storage cannot be used in production");
    }

    if config.server.public_url.is_none() {
        warn!("server.public_url is unset; upload URLs follow the request Host header");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
