//! Integration test: inference engine over the sample artifacts

use income_inference::inference::{Classifier, InferenceConfig, InferenceEngine, LogisticModel};
use income_inference::preprocessing::{DataPreprocessor, EncodingTables, RawRecord};
use income_inference::{InferenceError, Result, ValidationError};
use std::path::PathBuf;
use std::sync::Arc;

fn config() -> InferenceConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    InferenceConfig::new()
        .with_model_path(root.join("model/model.json"))
        .with_model_docs_dir(root.join("model_docs"))
}

fn sample_record() -> RawRecord {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/record.json");
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// Returns fixed probabilities and remembers nothing
struct FixedClassifier(Vec<f64>);

impl Classifier for FixedClassifier {
    fn n_features(&self) -> usize {
        13
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        assert_eq!(features.len(), 13);
        Ok(self.0.clone())
    }
}

fn engine_with(proba: Vec<f64>) -> InferenceEngine {
    let tables = Arc::new(EncodingTables::load_dir(config().model_docs_dir).unwrap());
    let preprocessor = DataPreprocessor::new(tables).unwrap();
    InferenceEngine::new(preprocessor, Arc::new(FixedClassifier(proba)))
}

#[test]
fn test_load_sample_artifacts() {
    let engine = InferenceEngine::load(&config()).unwrap();
    assert_eq!(engine.model().n_features(), 13);

    let prediction = engine.predict(&sample_record()).unwrap();
    assert!(prediction.prediction <= 1);
    assert!(prediction.probability >= 0.5 && prediction.probability <= 1.0);
    assert!(prediction.imputed_features.is_empty());
}

#[test]
fn test_prediction_matches_model() {
    let engine = InferenceEngine::load(&config()).unwrap();
    let record = sample_record();

    let features = engine.preprocess(&record).unwrap().features;
    let model = LogisticModel::load(config().model_path).unwrap();
    let proba = model.predict_proba(&features).unwrap();

    let prediction = engine.predict(&record).unwrap();
    assert_eq!(prediction.prediction, model.predict(&features).unwrap());
    assert_eq!(prediction.probability, proba[0].max(proba[1]));
}

#[test]
fn test_probability_is_max_class_probability() {
    let prediction = engine_with(vec![0.2, 0.8]).predict(&sample_record()).unwrap();
    assert_eq!(prediction.prediction, 1);
    assert_eq!(prediction.probability, 0.8);

    let prediction = engine_with(vec![0.9, 0.1]).predict(&sample_record()).unwrap();
    assert_eq!(prediction.prediction, 0);
    assert_eq!(prediction.probability, 0.9);
}

#[test]
fn test_imputed_features_pass_through() {
    let record = sample_record().with_missing("education-num");
    let prediction = engine_with(vec![0.5, 0.5]).predict(&record).unwrap();
    assert_eq!(prediction.imputed_features, vec!["education-num"]);
    assert_eq!(prediction.prediction, 0);
}

#[test]
fn test_validation_errors_are_client_errors() {
    let record = sample_record().with("sex", "Unknown");
    let err = engine_with(vec![0.5, 0.5]).predict(&record).unwrap_err();
    assert!(err.is_client_error());
    assert!(matches!(
        err,
        InferenceError::Validation(ValidationError::UnknownCategory { .. })
    ));
}

#[test]
fn test_missing_model_is_config_error() {
    let err = InferenceEngine::load(&config().with_model_path("/nonexistent/model.json")).unwrap_err();
    assert!(matches!(err, InferenceError::Config(_)));
    assert!(!err.is_client_error());
}
