//! Income Inference - income class prediction service
//!
//! Converts raw, possibly incomplete personal and professional attributes
//! into the feature vector a trained classifier expects, then predicts.
//!
//! # Modules
//!
//! - [`preprocessing`] - Encoding tables, feature transforms and the preprocessing pipeline
//! - [`inference`] - Model collaborator and inference engine
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core modules
pub mod preprocessing;
pub mod inference;

// Services
pub mod server;
pub mod cli;

pub use error::{InferenceError, Result, ValidationError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{InferenceError, Result, ValidationError};

    // Preprocessing
    pub use crate::preprocessing::{
        DataPreprocessor, EncodingTables, Feature, FeatureValue, PreprocessedRecord,
        PreprocessingConfig, RawRecord, StandardStats, FEATURE_ORDER,
    };

    // Inference
    pub use crate::inference::{Classifier, InferenceConfig, InferenceEngine, LogisticModel, Prediction};
}
