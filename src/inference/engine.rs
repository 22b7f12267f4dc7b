//! Inference engine: preprocessing followed by classification

use crate::error::Result;
use crate::preprocessing::{DataPreprocessor, EncodingTables, PreprocessedRecord, RawRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::{Classifier, InferenceConfig, LogisticModel};

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class (0: <=50K, 1: >50K)
    pub prediction: usize,
    /// Probability of the predicted class
    pub probability: f64,
    /// Features filled from the mode table
    pub imputed_features: Vec<String>,
}

/// Preprocessor and model, both read-only once built
#[derive(Clone)]
pub struct InferenceEngine {
    preprocessor: DataPreprocessor,
    model: Arc<dyn Classifier>,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("preprocessor", &self.preprocessor)
            .field("n_features", &self.model.n_features())
            .finish()
    }
}

impl InferenceEngine {
    pub fn new(preprocessor: DataPreprocessor, model: Arc<dyn Classifier>) -> Self {
        Self { preprocessor, model }
    }

    /// Load encoding tables and the model artifact named by `config`
    pub fn load(config: &InferenceConfig) -> Result<Self> {
        let tables = Arc::new(EncodingTables::load_dir(&config.model_docs_dir)?);
        let preprocessor = DataPreprocessor::with_config(tables, config.preprocessing.clone())?;
        let model = LogisticModel::load(&config.model_path)?;
        Ok(Self::new(preprocessor, Arc::new(model)))
    }

    pub fn preprocessor(&self) -> &DataPreprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    /// Preprocess only, without calling the model
    pub fn preprocess(&self, record: &RawRecord) -> Result<PreprocessedRecord> {
        self.preprocessor.preprocess(record)
    }

    /// Predict the class of one record
    pub fn predict(&self, record: &RawRecord) -> Result<Prediction> {
        info!(input = ?record, "Input data");

        let (features, imputed_features) = self.preprocessor.preprocess(record)?.into_parts();
        info!(processed = ?features, "Processed data");
        info!(imputed = ?imputed_features, "Imputed features");

        let proba = self.model.predict_proba(&features)?;
        let prediction = self.model.predict(&features)?;
        let probability = proba.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Prediction {
            prediction,
            probability,
            imputed_features,
        })
    }
}
