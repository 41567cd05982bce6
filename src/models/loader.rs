//! Model artifact loader

use crate::config::{ModelConfig, ModelFormat};
use crate::models::classifier::Classifier;
use crate::models::linear::LinearClassifier;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "onnx")]
use crate::models::inference::{select_label_output, OnnxClassifier};
#[cfg(feature = "onnx")]
use ort::session::{builder::GraphOptimizationLevel, Session};

/// Loaded ONNX model with metadata
#[cfg(feature = "onnx")]
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for predicted labels
    pub output_name: String,
}

/// Loader for serialized classifiers
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier described by the model configuration
    pub fn load(&self, config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
        let format = config.resolved_format();
        info!(path = %config.path.display(), format = ?format, "Loading model artifact");

        if !config.path.exists() {
            anyhow::bail!("Model file not found: {}", config.path.display());
        }

        let classifier: Arc<dyn Classifier> = match format {
            ModelFormat::Linear => Arc::new(LinearClassifier::from_file(&config.path)?),
            ModelFormat::Onnx => self.load_onnx(&config.path)?,
        };

        info!(
            model = %classifier.name(),
            features = classifier.feature_count(),
            "Model ready"
        );

        Ok(classifier)
    }

    #[cfg(feature = "onnx")]
    fn load_onnx(&self, path: &Path) -> Result<Arc<dyn Classifier>> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("onnx")
            .to_string();
        let model = self.load_model(path, &name)?;
        Ok(Arc::new(OnnxClassifier::new(model)))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx(&self, path: &Path) -> Result<Arc<dyn Classifier>> {
        anyhow::bail!(
            "Cannot load {}: built without the `onnx` feature",
            path.display()
        )
    }

    /// Load a single ONNX model from file
    #[cfg(feature = "onnx")]
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let output_name = select_label_output(&output_names)
            .with_context(|| format!("Model {:?} declares no outputs", path))?;

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
