//! Census Income Prediction Service - Main Entry Point
//!
//! Loads the classifier once, then serves predictions and the web UI over HTTP.

use anyhow::Result;
use census_income_service::{
    config::{AppConfig, LoggingConfig},
    models::ModelLoader,
    server,
    types::FEATURE_COUNT,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting Census Income Prediction Service");
    info!(
        host = %config.server.host,
        port = config.server.port,
        model = %config.model.path.display(),
        format = ?config.model.resolved_format(),
        "Configuration loaded"
    );

    // Load the model once; it is shared read-only by every request
    let loader = ModelLoader::with_threads(config.model.onnx_threads);
    let classifier = loader.load(&config.model)?;
    info!(
        model = %classifier.name(),
        "Classifier initialized ({} features)",
        FEATURE_COUNT
    );

    server::serve(&config, classifier).await?;

    info!("Service shutting down...");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(format!(
            "census_income_service={level},tower_http={level}",
            level = logging.level
        )),
    };

    if logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    }

    Ok(())
}
