//! Inference module
//!
//! Wraps the preprocessing pipeline and a read-only classifier:
//! - Model artifact loading (JSON logistic regression)
//! - Class probabilities and argmax prediction
//! - Imputation reporting passed through to callers

mod config;
mod engine;
mod model;

pub use config::InferenceConfig;
pub use engine::{InferenceEngine, Prediction};
pub use model::{Classifier, LogisticModel};
