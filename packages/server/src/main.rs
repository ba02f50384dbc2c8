//! Waiting line server
//!
//! Loads settings, connects the store and serves the HTTP API until a
//! shutdown signal arrives.

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use server::config::Settings;
use server::{AppState, router, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let settings = Settings::load()?;
    telemetry::init_tracing(settings.json_logs);

    info!("Starting waitline v{}", env!("CARGO_PKG_VERSION"));
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        database = %settings.database.url,
        "Configuration loaded"
    );
    settings.warn_insecure_defaults();

    let service = api::init(settings.service_config())
        .await
        .context("Failed to initialize the waiting line")?;

    let app = router(AppState::new(service.clone()));

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
