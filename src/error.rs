//! Error types for the income inference service

use thiserror::Error;

/// Result type alias for inference operations
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Client-data errors raised while preprocessing a record.
///
/// These are never retried: the same record always fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Too many missing values: {missing:?}")]
    TooManyMissingValues { missing: Vec<String> },

    #[error("Unknown category '{value}' for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },

    #[error("Could not convert '{value}' to a number for feature '{feature}'")]
    BadNumericValue { feature: String, value: String },
}

/// Main error type for the service
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model error: {0}")]
    Model(String),
}

impl InferenceError {
    /// Whether the error was caused by the request data rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, InferenceError::Validation(_))
    }

    /// Borrow the validation error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            InferenceError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(err: serde_json::Error) -> Self {
        InferenceError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InferenceError::Config("missing table".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing table");
    }

    #[test]
    fn test_validation_display_is_transparent() {
        let err: InferenceError = ValidationError::UnknownCategory {
            feature: "workclass".to_string(),
            value: "Not-A-Real-Class".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Unknown category 'Not-A-Real-Class' for feature 'workclass'"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InferenceError = io_err.into();
        assert!(matches!(err, InferenceError::Io(_)));
        assert!(!err.is_client_error());
        assert!(err.as_validation().is_none());
    }
}
