//! Classifier abstraction shared by every model backend

use crate::types::{FeatureRecord, PredictedLabel};
use anyhow::Result;

/// A pre-fitted model that labels one feature record at a time.
///
/// Implementations are loaded once at startup and shared read-only between
/// request handlers, so they must be `Send + Sync`.
pub trait Classifier: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Number of input features the model was fit on
    fn feature_count(&self) -> usize;

    /// Predict the label(s) for a single record
    fn predict(&self, record: &FeatureRecord) -> Result<Vec<PredictedLabel>>;
}
