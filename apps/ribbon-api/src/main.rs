//! # ribbon-api
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ribbon API Server                                │
//! │                                                                         │
//! │  SPA / admin ───► HTTP (3000) ───► routes ───► SQLite (WAL)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ribbon_api::{app, ApiConfig, AppState};
use ribbon_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ribbon_api=info,ribbon_db=info,tower_http=info".into()),
        )
        .with_target(true)
        .init();

    info!("Starting ribbon API server...");

    let config = ApiConfig::load().context("loading configuration")?;
    info!(
        address = %config.bind_address(),
        database = %config.database_path,
        "Configuration loaded"
    );

    if config.uses_dev_secret() {
        warn!("RIBBON_JWT_SECRET is not set; using the development secret");
    }

    let db_config = if config.database_path == ":memory:" {
        DbConfig::in_memory()
    } else {
        DbConfig::new(&config.database_path)
    };
    let db = Database::new(db_config)
        .await
        .with_context(|| format!("opening database {}", config.database_path))?;
    info!("Database ready");

    let address = config.bind_address();
    let state = AppState::new(db.clone(), config);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
