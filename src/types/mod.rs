//! Core data types for the census income service

pub mod feature_record;
pub mod prediction;

pub use feature_record::{FeatureRecord, RecordError, FEATURE_COUNT, FEATURE_KEYS};
pub use prediction::{ErrorResponse, PredictedLabel, PredictionResponse};
