//! Error types for the server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{InferenceError, ValidationError};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<InferenceError> for ServerError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Validation(v) => ServerError::Validation(v),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Structured `details` payload of a validation failure
fn validation_details(err: &ValidationError) -> Value {
    match err {
        ValidationError::TooManyMissingValues { missing } => json!(missing),
        ValidationError::UnknownCategory { feature, value } => json!({
            "feature": feature,
            "value": value,
        }),
        ValidationError::BadNumericValue { .. } => json!(err.to_string()),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::Validation(err) => {
                tracing::warn!(error = %err, "Rejected prediction input");
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Invalid input data",
                        "details": validation_details(err),
                    }),
                )
            }
            ServerError::InvalidBody { status, message } => (
                *status,
                json!({
                    "error": "Invalid request body",
                    "details": message,
                }),
            ),
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Unexpected error during prediction");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal server error",
                        "details": msg,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_details_shapes() {
        let missing = ValidationError::TooManyMissingValues {
            missing: vec!["age".to_string(), "sex".to_string()],
        };
        assert_eq!(validation_details(&missing), json!(["age", "sex"]));

        let unknown = ValidationError::UnknownCategory {
            feature: "workclass".to_string(),
            value: "Not-A-Real-Class".to_string(),
        };
        assert_eq!(
            validation_details(&unknown),
            json!({"feature": "workclass", "value": "Not-A-Real-Class"})
        );

        let bad = ValidationError::BadNumericValue {
            feature: "fnlwgt".to_string(),
            value: "heavy".to_string(),
        };
        assert!(validation_details(&bad).as_str().unwrap().contains("fnlwgt"));
    }

    #[test]
    fn test_status_codes() {
        let resp = ServerError::from(InferenceError::Config("broken".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = ServerError::from(InferenceError::from(ValidationError::TooManyMissingValues {
            missing: vec![],
        }))
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
