//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::inference::Prediction;
use crate::preprocessing::{Feature, FeatureValue, RawRecord};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Request body of `POST /predict`.
///
/// Every field may be null or omitted; numeric fields also accept strings,
/// and empty strings count as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Age of the individual
    pub age: Option<FeatureValue>,
    /// Number of work hours per week
    pub hours_per_week: Option<FeatureValue>,
    /// Type of employer (e.g., Private, Self-emp-not-inc, Federal-gov)
    pub workclass: Option<String>,
    /// Marital status (e.g., Never-married, Married-civ-spouse)
    pub marital_status: Option<String>,
    /// Occupation category
    pub occupation: Option<String>,
    /// Family role (e.g., Not-in-family, Husband)
    pub relationship: Option<String>,
    pub race: Option<String>,
    pub sex: Option<String>,
    /// Country of origin
    pub native_country: Option<String>,
    /// Education level (in years)
    pub education_num: Option<FeatureValue>,
    pub capital_gain: Option<FeatureValue>,
    pub capital_loss: Option<FeatureValue>,
    /// Final weight
    pub fnlwgt: Option<FeatureValue>,
}

impl From<PredictionInput> for RawRecord {
    fn from(input: PredictionInput) -> Self {
        let text = |v: Option<String>| v.map(FeatureValue::Text);
        [
            (Feature::Age, input.age),
            (Feature::HoursPerWeek, input.hours_per_week),
            (Feature::Workclass, text(input.workclass)),
            (Feature::MaritalStatus, text(input.marital_status)),
            (Feature::Occupation, text(input.occupation)),
            (Feature::Relationship, text(input.relationship)),
            (Feature::Race, text(input.race)),
            (Feature::Sex, text(input.sex)),
            (Feature::NativeCountry, text(input.native_country)),
            (Feature::EducationNum, input.education_num),
            (Feature::CapitalGain, input.capital_gain),
            (Feature::CapitalLoss, input.capital_loss),
            (Feature::Fnlwgt, input.fnlwgt),
        ]
        .into_iter()
        .map(|(feature, value)| (feature.name(), value))
        .collect()
    }
}

/// Predict income class for one individual
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<Prediction>> {
    let Json(input) = payload?;
    let record = RawRecord::from(input);

    let prediction = state.engine.predict(&record).map_err(|e| {
        error!(error = %e, "Error during prediction");
        ServerError::from(e)
    })?;

    Ok(Json(prediction))
}

/// Health check
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "n_features": state.engine.model().n_features(),
        "max_missing_ratio": state.engine.preprocessor().config().max_missing_ratio,
        "model_path": state.config.inference.model_path.display().to_string(),
        "model_docs_dir": state.config.inference.model_docs_dir.display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_renamed() {
        let input: PredictionInput = serde_json::from_str(
            r#"{"age": 25, "hours_per_week": null, "native_country": "United-States", "capital_gain": ""}"#,
        )
        .unwrap();
        let record = RawRecord::from(input);

        let names: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, Feature::ALL.iter().map(|f| f.name()).collect::<Vec<_>>());
        assert_eq!(record.get("age"), Some(&FeatureValue::Int(25)));
        assert_eq!(record.get("hours-per-week"), None);
        assert_eq!(record.get("capital-gain"), None);
        assert_eq!(
            record.get("native-country"),
            Some(&FeatureValue::Text("United-States".to_string()))
        );
    }
}
