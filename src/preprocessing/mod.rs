//! Feature preprocessing module
//!
//! Turns a raw, possibly incomplete attribute record into the numeric feature
//! vector the classifier was trained on:
//! - Missing value accounting and threshold enforcement
//! - Mode imputation from a static table
//! - Age / weekly-hours bucketing
//! - Label encoding against a fixed vocabulary
//! - Standardization with precomputed mean and variance

mod config;
mod pipeline;
mod record;
mod tables;
pub mod transforms;

pub use config::{PreprocessingConfig, DEFAULT_MAX_MISSING_RATIO};
pub use pipeline::{DataPreprocessor, PreprocessedRecord};
pub use record::RawRecord;
pub use tables::{
    EncodingTables, StandardStats, LABEL_MAPPINGS_FILE, MODE_VALUES_FILE, STANDARD_SCALER_FILE,
};
pub use transforms::{AgeGroup, WorkTimeCategory};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Synthetic label-table name for the derived age band
pub const AGE_GROUP: &str = "age_group";

/// Synthetic label-table name for the derived weekly-hours band
pub const WORK_TIME_CATEGORY: &str = "work_time_category";

/// Names of the processed vector's slots, in the order the model expects.
/// Changing this order requires retraining the model.
pub const FEATURE_ORDER: [&str; 13] = [
    AGE_GROUP,
    WORK_TIME_CATEGORY,
    "workclass",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "native-country",
    "education-num",
    "capital-gain",
    "capital-loss",
    "fnlwgt",
];

/// The canonical raw input features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Age,
    HoursPerWeek,
    Workclass,
    MaritalStatus,
    Occupation,
    Relationship,
    Race,
    Sex,
    NativeCountry,
    EducationNum,
    CapitalGain,
    CapitalLoss,
    Fnlwgt,
}

impl Feature {
    /// Every raw feature, in request schema order
    pub const ALL: [Feature; 13] = [
        Feature::Age,
        Feature::HoursPerWeek,
        Feature::Workclass,
        Feature::MaritalStatus,
        Feature::Occupation,
        Feature::Relationship,
        Feature::Race,
        Feature::Sex,
        Feature::NativeCountry,
        Feature::EducationNum,
        Feature::CapitalGain,
        Feature::CapitalLoss,
        Feature::Fnlwgt,
    ];

    /// Features label-encoded as-is, in output order
    pub const CATEGORICAL: [Feature; 7] = [
        Feature::Workclass,
        Feature::MaritalStatus,
        Feature::Occupation,
        Feature::Relationship,
        Feature::Race,
        Feature::Sex,
        Feature::NativeCountry,
    ];

    /// Features standardized with mean/variance, in output order
    pub const STANDARDIZED: [Feature; 3] =
        [Feature::CapitalGain, Feature::CapitalLoss, Feature::Fnlwgt];

    /// Internal (hyphenated) feature name
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::HoursPerWeek => "hours-per-week",
            Feature::Workclass => "workclass",
            Feature::MaritalStatus => "marital-status",
            Feature::Occupation => "occupation",
            Feature::Relationship => "relationship",
            Feature::Race => "race",
            Feature::Sex => "sex",
            Feature::NativeCountry => "native-country",
            Feature::EducationNum => "education-num",
            Feature::CapitalGain => "capital-gain",
            Feature::CapitalLoss => "capital-loss",
            Feature::Fnlwgt => "fnlwgt",
        }
    }

    /// Look up a feature by its internal name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the feature holds a number (as opposed to a category label)
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Feature::Age
                | Feature::HoursPerWeek
                | Feature::EducationNum
                | Feature::CapitalGain
                | Feature::CapitalLoss
                | Feature::Fnlwgt
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FeatureValue {
    /// Empty strings count as missing, same as null
    pub fn is_blank(&self) -> bool {
        matches!(self, FeatureValue::Text(s) if s.is_empty())
    }

    /// Numeric view of the value. Text is trimmed and parsed; NaN and
    /// infinities are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            FeatureValue::Int(v) => *v as f64,
            FeatureValue::Float(v) => *v,
            FeatureValue::Text(s) => s.trim().parse().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Label view of the value, used for vocabulary lookups
    pub fn as_label(&self) -> String {
        match self {
            FeatureValue::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{}", v),
            FeatureValue::Float(v) => write!(f, "{}", v),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Int(v as i64)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}
