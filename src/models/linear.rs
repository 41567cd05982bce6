//! Linear decision-function classifier loaded from a JSON artifact.
//!
//! Covers linear SVMs and logistic regression exported as plain coefficients.
//! A binary model has one coefficient row; a multi-class model has one row per
//! class and picks the class with the highest decision value (one-vs-rest).

use crate::models::classifier::Classifier;
use crate::types::{FeatureRecord, PredictedLabel, FEATURE_COUNT};
use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Standardization applied before the decision function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                // sklearn leaves constant features unscaled
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect()
    }
}

/// Serialized form of a linear classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    /// Class labels, in the order the coefficients refer to
    pub classes: Vec<i64>,
    /// One row per decision function, `FEATURE_COUNT` entries each
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per decision function
    pub intercept: Vec<f64>,
    /// Optional feature standardization
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

/// Immutable linear classifier
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    artifact: LinearModelArtifact,
}

impl LinearClassifier {
    /// Build a classifier from an artifact, checking its shapes.
    pub fn new(artifact: LinearModelArtifact) -> Result<Self> {
        let rows = artifact.coefficients.len();

        ensure!(rows > 0, "linear model has no coefficient rows");
        ensure!(
            artifact.classes.len() >= 2,
            "linear model needs at least two classes, found {}",
            artifact.classes.len()
        );

        for (idx, row) in artifact.coefficients.iter().enumerate() {
            ensure!(
                row.len() == FEATURE_COUNT,
                "coefficient row {} has {} entries, expected {}",
                idx,
                row.len(),
                FEATURE_COUNT
            );
        }

        ensure!(
            artifact.intercept.len() == rows,
            "intercept has {} entries for {} coefficient rows",
            artifact.intercept.len(),
            rows
        );

        if rows == 1 {
            ensure!(
                artifact.classes.len() == 2,
                "binary model must declare exactly two classes, found {}",
                artifact.classes.len()
            );
        } else if rows != artifact.classes.len() {
            bail!(
                "multi-class model has {} coefficient rows for {} classes",
                rows,
                artifact.classes.len()
            );
        }

        if let Some(scaler) = &artifact.scaler {
            ensure!(
                scaler.mean.len() == FEATURE_COUNT && scaler.scale.len() == FEATURE_COUNT,
                "scaler must have {} mean and scale entries",
                FEATURE_COUNT
            );
        }

        Ok(Self { artifact })
    }

    /// Load and validate an artifact from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {:?}", path))?;
        let artifact: LinearModelArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse linear model {:?}", path))?;

        let model = Self::new(artifact)
            .with_context(|| format!("Invalid linear model {:?}", path))?;

        info!(
            path = %path.display(),
            classes = ?model.artifact.classes,
            scaled = model.artifact.scaler.is_some(),
            "Linear model loaded"
        );

        Ok(model)
    }

    /// Raw decision values, one per coefficient row
    pub fn decision_function(&self, record: &FeatureRecord) -> Vec<f64> {
        let features = match &self.artifact.scaler {
            Some(scaler) => scaler.transform(record.values()),
            None => record.values().to_vec(),
        };

        self.artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercept)
            .map(|(row, &b)| row.iter().zip(&features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }

    /// Class labels the model can emit
    pub fn classes(&self) -> &[i64] {
        &self.artifact.classes
    }
}

impl Classifier for LinearClassifier {
    fn name(&self) -> &str {
        "linear"
    }

    fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, record: &FeatureRecord) -> Result<Vec<PredictedLabel>> {
        let scores = self.decision_function(record);
        let classes = &self.artifact.classes;

        let label = if scores.len() == 1 {
            if scores[0] > 0.0 {
                classes[1]
            } else {
                classes[0]
            }
        } else {
            let best = scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (idx, &score)| {
                    if score > best.1 {
                        (idx, score)
                    } else {
                        best
                    }
                })
                .0;
            classes[best]
        };

        Ok(vec![PredictedLabel::Class(label)])
    }
}
