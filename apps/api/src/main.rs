//! # StockPOS API Server
//!
//! HTTP/JSON server binary.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         StockPOS API Server                             │
//! │                                                                         │
//! │  SPA frontend ───► HTTP/JSON (3000) ───► Repositories ───► SQLite      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;

use stockpos_api::{router, ApiConfig, AppState};
use stockpos_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing. RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting StockPOS API server...");

    let config = ApiConfig::load()?;
    info!(
        port = config.port,
        database = %config.database_path,
        "Configuration loaded"
    );

    // Opens (creating if missing) the SQLite database and runs migrations.
    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.database_max_connections),
    )
    .await?;
    info!("Database ready");

    let app = router(AppState { db: db.clone() });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
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
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
