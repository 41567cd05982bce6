//! Request handlers

use crate::models::Classifier;
use crate::server::error::ApiError;
use crate::types::feature_record::ValidatedRecord;
use crate::types::PredictionResponse;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

/// `POST /predict`
///
/// The body is parsed as JSON whatever its content type.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start_time = Instant::now();

    let result = run_prediction(state.classifier, body).await;

    match &result {
        Ok(response) => debug!(
            prediction = ?response.prediction,
            processing_time_us = start_time.elapsed().as_micros(),
            "Prediction served"
        ),
        Err(e @ ApiError::BadRequest(_)) => debug!(error = %e, "Rejected prediction request"),
        Err(e) => error!(error = %e, "Prediction failed"),
    }

    result.map(Json)
}

async fn run_prediction(
    classifier: Arc<dyn Classifier>,
    body: Bytes,
) -> Result<PredictionResponse, ApiError> {
    let payload: Value = serde_json::from_slice(&body)?;

    // All keys must be present before any value is looked at
    let validated = ValidatedRecord::validate(&payload)?;
    let record = validated.coerce()?;

    let labels = tokio::task::spawn_blocking(move || classifier.predict(&record))
        .await
        .map_err(|e| ApiError::Internal(format!("Inference task failed: {}", e)))??;

    Ok(PredictionResponse::new(labels))
}
