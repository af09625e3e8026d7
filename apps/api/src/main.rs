//! # Wareflow API
//!
//! REST server for warehouse inventory and order management.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Server Startup                               │
//! │                                                                         │
//! │  tracing ──► AppConfig::load ──► Store::open ──► Router ──► serve     │
//! │                                      │                                  │
//! │                         sqlite: pool + migrations                       │
//! │                         memory: JSON seed set                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wareflow_api::{build_router, AppConfig, AppState, Store, API_PREFIX};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Wareflow API server...");

    let config = AppConfig::load()?;
    info!(
        bind = %config.bind_addr,
        port = config.port,
        storage = ?config.storage,
        "Configuration loaded"
    );

    let store = Store::open(&config).await?;
    let state = AppState::new(store);
    let app = build_router(state.clone());

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, prefix = API_PREFIX, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wareflow=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to install Ctrl+C handler");
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
                error!(?e, "Failed to install SIGTERM handler");
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
