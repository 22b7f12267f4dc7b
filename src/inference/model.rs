//! Classifier collaborator
//!
//! The service treats the model as a read-only artifact: it is loaded once
//! and only ever asked for class probabilities.

use crate::error::{InferenceError, Result};
use crate::preprocessing::FEATURE_ORDER;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A trained classifier over the processed feature vector
pub trait Classifier: Send + Sync {
    /// Number of input features the model expects
    fn n_features(&self) -> usize;

    /// Per-class probabilities for one feature vector
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Most probable class. Ties go to the lowest class index.
    fn predict(&self, features: &[f64]) -> Result<usize> {
        let proba = self.predict_proba(features)?;
        proba
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .map(|(i, _)| i)
            .ok_or_else(|| InferenceError::Model("model returned no class probabilities".to_string()))
    }
}

/// On-disk layout of a logistic model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Binary logistic regression with fixed coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ModelArtifact", into = "ModelArtifact")]
pub struct LogisticModel {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticModel {
    /// Create a model; the coefficient count must match the feature vector
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            coefficients: Array1::from_vec(coefficients),
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            InferenceError::Config(format!("failed to read model {}: {}", path.display(), e))
        })?;
        let model: Self = serde_json::from_str(&contents)?;
        info!(path = %path.display(), n_features = model.coefficients.len(), "Model loaded");
        Ok(model)
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn validate(&self) -> Result<()> {
        if self.coefficients.len() != FEATURE_ORDER.len() {
            return Err(InferenceError::Config(format!(
                "model has {} coefficients, feature vector has {}",
                self.coefficients.len(),
                FEATURE_ORDER.len()
            )));
        }
        Ok(())
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }
}

impl TryFrom<ModelArtifact> for LogisticModel {
    type Error = InferenceError;

    fn try_from(artifact: ModelArtifact) -> Result<Self> {
        Self::new(artifact.coefficients, artifact.intercept)
    }
}

impl From<LogisticModel> for ModelArtifact {
    fn from(model: LogisticModel) -> Self {
        Self {
            coefficients: model.coefficients.to_vec(),
            intercept: model.intercept,
        }
    }
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::ShapeError {
                expected: format!("{} features", self.coefficients.len()),
                actual: format!("{} features", features.len()),
            });
        }
        let x = Array1::from(features.to_vec());
        let p = Self::sigmoid(x.dot(&self.coefficients) + self.intercept);
        Ok(vec![1.0 - p, p])
    }
}
