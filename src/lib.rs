//! Census Income Prediction Service Library
//!
//! Serves a pre-trained income classifier over HTTP: `POST /predict` labels a
//! fourteen-feature census record, and every other `GET` path is answered from
//! a static web directory.

pub mod config;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use models::{Classifier, ModelLoader};
pub use server::{build_router, AppState};
pub use types::{feature_record::FeatureRecord, prediction::PredictionResponse};
