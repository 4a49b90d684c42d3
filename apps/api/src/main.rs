//! # Tienda API
//!
//! HTTP server for the store's web frontend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda API Server                                │
//! │                                                                         │
//! │  Frontend ───► HTTP (8080) ───► /api routes ───► SQLite (tienda.db)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tienda_api::config::ApiConfig;
use tienda_api::{build_router, AppState};
use tienda_db::{Database, DbConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ApiConfig::load()?;

    // Initialize tracing; RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Tienda API server...");
    info!(
        port = config.http_port,
        database = %config.database_path,
        origins = ?config.cors_allowed_origins,
        "Configuration loaded"
    );

    // Open database (runs migrations)
    let db_config = DbConfig::new(&config.database_path).max_connections(config.db_max_connections);
    let db = Database::new(db_config).await?;

    let app = build_router(AppState::new(db.clone()), &config.cors_allowed_origins);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
