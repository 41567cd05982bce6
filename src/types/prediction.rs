//! Prediction response data structures

use serde::{Deserialize, Serialize};

/// A single model output value.
///
/// Classifiers normally emit integer class labels; regressors or score
/// outputs come back as floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictedLabel {
    Class(i64),
    Score(f64),
}

impl PredictedLabel {
    /// Numeric view of the label
    pub fn as_f64(&self) -> f64 {
        match *self {
            PredictedLabel::Class(c) => c as f64,
            PredictedLabel::Score(s) => s,
        }
    }
}

impl From<i64> for PredictedLabel {
    fn from(class: i64) -> Self {
        PredictedLabel::Class(class)
    }
}

impl From<f64> for PredictedLabel {
    fn from(score: f64) -> Self {
        PredictedLabel::Score(score)
    }
}

/// Body of a successful `/predict` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: Vec<PredictedLabel>,
}

impl PredictionResponse {
    pub fn new(prediction: Vec<PredictedLabel>) -> Self {
        Self { prediction }
    }
}

/// Body of a failed `/predict` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
