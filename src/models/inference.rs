//! ONNX Runtime classifier for exported models (e.g. skl2onnx SVC exports)

use crate::models::classifier::Classifier;
use crate::models::loader::LoadedModel;
use crate::types::{FeatureRecord, PredictedLabel, FEATURE_COUNT};
use anyhow::{Context, Result};
use ort::value::Tensor;
use std::sync::Mutex;
use tracing::debug;

/// Classifier backed by an ONNX Runtime session.
///
/// Running a session needs exclusive access, so the session sits behind a
/// mutex; predictions from concurrent requests are serialized.
pub struct OnnxClassifier {
    model: Mutex<LoadedModel>,
    name: String,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel) -> Self {
        let name = model.name.clone();
        Self {
            model: Mutex::new(model),
            name,
        }
    }

    fn run(&self, features: Vec<f32>) -> Result<Vec<PredictedLabel>> {
        let mut guard = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let model = &mut *guard;

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features)).context("Failed to create input tensor")?;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        let output = outputs
            .get(model.output_name.as_str())
            .with_context(|| format!("Model output '{}' missing", model.output_name))?;

        if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            debug!(model = %model.name, labels = ?data, "Extracted int64 labels");
            return Ok(labels_from_classes(data));
        }

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .with_context(|| format!("Unsupported output type for '{}'", model.output_name))?;
        debug!(model = %model.name, labels = ?data, "Extracted float labels");
        Ok(labels_from_scores(data))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, record: &FeatureRecord) -> Result<Vec<PredictedLabel>> {
        self.run(record.to_f32_row())
    }
}

/// Pick the output holding predicted labels: the first one named like a
/// label, otherwise the first output.
pub fn select_label_output(names: &[String]) -> Option<String> {
    names
        .iter()
        .find(|name| name.to_ascii_lowercase().contains("label"))
        .or_else(|| names.first())
        .cloned()
}

fn labels_from_classes(data: &[i64]) -> Vec<PredictedLabel> {
    data.iter().copied().map(PredictedLabel::Class).collect()
}

fn labels_from_scores(data: &[f32]) -> Vec<PredictedLabel> {
    data.iter()
        .map(|&v| PredictedLabel::Score(v as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_output_preferred() {
        let names = vec!["probabilities".to_string(), "output_label".to_string()];
        assert_eq!(select_label_output(&names), Some("output_label".to_string()));
    }

    #[test]
    fn test_label_output_falls_back_to_first() {
        let names = vec!["variable".to_string(), "scores".to_string()];
        assert_eq!(select_label_output(&names), Some("variable".to_string()));
        assert_eq!(select_label_output(&[]), None);
    }

    #[test]
    fn test_label_conversion() {
        assert_eq!(
            labels_from_classes(&[1]),
            vec![PredictedLabel::Class(1)]
        );
        assert_eq!(
            labels_from_scores(&[0.5]),
            vec![PredictedLabel::Score(0.5)]
        );
    }
}
