//! Inference configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{InferenceError, Result};
use crate::preprocessing::PreprocessingConfig;

/// Where the model and its encoding tables live, and how records are checked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// JSON model artifact
    pub model_path: PathBuf,

    /// Directory holding label mappings, scaler statistics and mode values
    pub model_docs_dir: PathBuf,

    /// Record preprocessing settings
    pub preprocessing: PreprocessingConfig,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/model.json"),
            model_docs_dir: PathBuf::from("model_docs"),
            preprocessing: PreprocessingConfig::default(),
        }
    }
}

impl InferenceConfig {
    /// Create a new inference configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `MODEL_PATH`, `MODEL_DOCS_DIR` and `MAX_MISSING_RATIO`.
    ///
    /// A `MAX_MISSING_RATIO` that is not a number is a configuration error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("MODEL_DOCS_DIR") {
            config.model_docs_dir = PathBuf::from(dir);
        }
        if let Ok(raw) = std::env::var("MAX_MISSING_RATIO") {
            config.preprocessing.max_missing_ratio = parse_ratio(&raw)?;
        }
        Ok(config)
    }

    /// Builder method to set the model artifact path
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Builder method to set the encoding tables directory
    pub fn with_model_docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_docs_dir = dir.into();
        self
    }

    /// Builder method to set the preprocessing configuration
    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }
}

fn parse_ratio(raw: &str) -> Result<f64> {
    raw.trim().parse().map_err(|_| {
        InferenceError::Config(format!("MAX_MISSING_RATIO must be a number, got '{}'", raw))
    })
}
