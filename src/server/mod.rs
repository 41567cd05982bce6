//! HTTP server: prediction endpoint and static file serving

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::build_router;

use crate::config::AppConfig;
use crate::models::Classifier;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the configured address and serve until a shutdown signal arrives
pub async fn serve(config: &AppConfig, classifier: Arc<dyn Classifier>) -> Result<()> {
    let addr = config.listen_addr()?;
    let app = build_router(AppState::new(classifier), &config.static_files);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        static_dir = %config.static_files.dir.display(),
        "Listening for requests"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
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
