//! Preprocessing pipeline: from a raw record to the model's feature vector

use crate::error::{InferenceError, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::transforms::{age_group, encode_categorical, encode_label, numeric, standardize, work_time_category};
use super::{EncodingTables, Feature, PreprocessingConfig, RawRecord, AGE_GROUP, FEATURE_ORDER, WORK_TIME_CATEGORY};

/// Output of [`DataPreprocessor::preprocess`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedRecord {
    /// Feature vector in [`FEATURE_ORDER`]
    pub features: Vec<f64>,
    /// Raw feature names that were filled from the mode table
    pub imputed_features: Vec<String>,
}

impl PreprocessedRecord {
    pub fn into_parts(self) -> (Vec<f64>, Vec<String>) {
        (self.features, self.imputed_features)
    }
}

/// Stateless record preprocessor over shared, immutable encoding tables
#[derive(Debug, Clone)]
pub struct DataPreprocessor {
    config: PreprocessingConfig,
    tables: Arc<EncodingTables>,
}

impl DataPreprocessor {
    /// Create a preprocessor with the default configuration
    pub fn new(tables: Arc<EncodingTables>) -> Result<Self> {
        Self::with_config(tables, PreprocessingConfig::default())
    }

    /// Create a preprocessor with a custom configuration.
    ///
    /// Fails if the age or hours mode falls in a band the label tables do
    /// not know, since every imputed record would then be rejected.
    pub fn with_config(tables: Arc<EncodingTables>, config: PreprocessingConfig) -> Result<Self> {
        config.validate()?;

        let age = numeric(None, Feature::Age.name(), &tables)?;
        let hours = numeric(None, Feature::HoursPerWeek.name(), &tables)?;
        for (table, label) in [(AGE_GROUP, age_group(age)), (WORK_TIME_CATEGORY, work_time_category(hours))] {
            encode_label(label, table, &tables).map_err(|_| {
                InferenceError::Config(format!(
                    "band '{}' of the mode value is missing from label table '{}'",
                    label, table
                ))
            })?;
        }

        Ok(Self { config, tables })
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    pub fn tables(&self) -> &EncodingTables {
        &self.tables
    }

    /// Missing canonical features, in record order.
    ///
    /// Canonical features absent from the record altogether come last, in
    /// canonical order. Unknown keys are ignored.
    pub fn missing_features(&self, record: &RawRecord) -> Vec<String> {
        let mut missing: Vec<String> = record
            .fields()
            .filter(|(name, value)| value.is_none() && Feature::from_name(name).is_some())
            .map(|(name, _)| name.to_string())
            .collect();

        missing.extend(
            Feature::ALL
                .iter()
                .filter(|f| !record.contains(f.name()))
                .map(|f| f.name().to_string()),
        );
        missing
    }

    /// Reject the record if too many canonical features are missing
    pub fn check_missing(&self, record: &RawRecord) -> Result<Vec<String>> {
        let missing = self.missing_features(record);
        let ratio = missing.len() as f64 / Feature::ALL.len() as f64;
        if ratio > self.config.max_missing_ratio {
            debug!(missing = missing.len(), ratio, "Rejecting record with too many missing values");
            return Err(ValidationError::TooManyMissingValues { missing }.into());
        }
        Ok(missing)
    }

    /// Build the model's feature vector for one record.
    ///
    /// The missing value threshold is checked before any encoding, so a
    /// record that fails both checks reports `TooManyMissingValues`.
    pub fn preprocess(&self, record: &RawRecord) -> Result<PreprocessedRecord> {
        let imputed_features = self.check_missing(record)?;
        let tables = self.tables.as_ref();
        let mut features = Vec::with_capacity(FEATURE_ORDER.len());

        let age = numeric(record.value(Feature::Age), Feature::Age.name(), tables)?;
        features.push(encode_label(age_group(age), AGE_GROUP, tables)?);

        let hours = numeric(record.value(Feature::HoursPerWeek), Feature::HoursPerWeek.name(), tables)?;
        features.push(encode_label(work_time_category(hours), WORK_TIME_CATEGORY, tables)?);

        for feature in Feature::CATEGORICAL {
            features.push(encode_categorical(record.value(feature), feature.name(), tables)?);
        }

        features.push(numeric(record.value(Feature::EducationNum), Feature::EducationNum.name(), tables)?);

        for feature in Feature::STANDARDIZED {
            features.push(standardize(record.value(feature), feature.name(), tables)?);
        }

        debug!(
            n_features = features.len(),
            imputed = imputed_features.len(),
            "Record preprocessed"
        );

        Ok(PreprocessedRecord {
            features,
            imputed_features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{FeatureValue, StandardStats};
    use std::collections::HashMap;

    fn tables() -> Arc<EncodingTables> {
        let vocab = |labels: &[&str]| -> HashMap<String, u32> {
            labels.iter().enumerate().map(|(i, l)| (l.to_string(), i as u32)).collect()
        };
        let mut labels = HashMap::new();
        labels.insert(
            AGE_GROUP.to_string(),
            vocab(&["0-20", "20-30", "30-40", "40-50", "50-60", "60-70", "70+"]),
        );
        labels.insert(
            WORK_TIME_CATEGORY.to_string(),
            vocab(&["Full-time", "Hard-time", "Over-time", "Part-time"]),
        );
        for feature in Feature::CATEGORICAL {
            labels.insert(feature.name().to_string(), vocab(&["x", "y", "z"]));
        }
        let stats = Feature::STANDARDIZED
            .iter()
            .map(|f| (f.name().to_string(), StandardStats::new(10.0, 4.0)))
            .collect();
        let modes = Feature::ALL
            .iter()
            .map(|f| {
                let v = if f.is_numeric() { FeatureValue::Int(12) } else { FeatureValue::from("y") };
                (f.name().to_string(), v)
            })
            .collect();
        Arc::new(EncodingTables::from_parts(labels, stats, modes).unwrap())
    }

    fn full_record() -> RawRecord {
        let mut record = RawRecord::new().with("age", 35).with("hours-per-week", 50);
        for feature in Feature::CATEGORICAL {
            record = record.with(feature.name(), "z");
        }
        record
            .with("education-num", 13)
            .with("capital-gain", 14)
            .with("capital-loss", 10.0)
            .with("fnlwgt", "6")
    }

    #[test]
    fn test_full_record_vector() {
        let pre = DataPreprocessor::new(tables()).unwrap();
        let out = pre.preprocess(&full_record()).unwrap();
        assert_eq!(
            out.features,
            vec![2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 13.0, 2.0, 0.0, -2.0]
        );
        assert!(out.imputed_features.is_empty());
    }

    #[test]
    fn test_two_missing_are_imputed() {
        let pre = DataPreprocessor::new(tables()).unwrap();
        let mut record = full_record();
        record.insert("sex", None);
        record.insert("age", Some(FeatureValue::from("")));
        let (features, imputed) = pre.preprocess(&record).unwrap().into_parts();
        assert_eq!(imputed, vec!["age".to_string(), "sex".to_string()]);
        // mode age 12 -> "0-20"; mode sex "y" -> 1
        assert_eq!(features[0], 0.0);
        assert_eq!(features[7], 1.0);
    }

    #[test]
    fn test_absent_keys_count_as_missing() {
        let pre = DataPreprocessor::new(tables()).unwrap();
        let record: RawRecord = full_record()
            .fields()
            .filter(|(name, _)| *name != "fnlwgt" && *name != "race")
            .map(|(n, v)| (n.to_string(), v.cloned()))
            .chain(std::iter::once(("extra".to_string(), None)))
            .collect();
        let missing = pre.missing_features(&record);
        assert_eq!(missing, vec!["race".to_string(), "fnlwgt".to_string()]);
        assert!(pre.preprocess(&record).is_ok());
    }

    #[test]
    fn test_threshold_is_strict() {
        let pre = DataPreprocessor::with_config(
            tables(),
            PreprocessingConfig::new().with_max_missing_ratio(3.0 / 13.0),
        )
        .unwrap();
        let mut record = full_record();
        for name in ["race", "sex", "fnlwgt"] {
            record.insert(name, None);
        }
        assert!(pre.preprocess(&record).is_ok());
        record.insert("age", None);
        assert!(pre.preprocess(&record).is_err());
    }

    #[test]
    fn test_bad_numeric_value() {
        let pre = DataPreprocessor::new(tables()).unwrap();
        let record = full_record().with("hours-per-week", "lots");
        let err = pre.preprocess(&record).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::BadNumericValue { feature, .. }) if feature == "hours-per-week"
        ));
    }

    #[test]
    fn test_mode_band_must_be_known() {
        let base = tables();
        let mut labels: HashMap<String, HashMap<String, u32>> = HashMap::new();
        for name in base.label_features() {
            labels.insert(name.to_string(), base.label_table(name).unwrap().clone());
        }
        labels.get_mut(AGE_GROUP).unwrap().remove("0-20");
        let stats = Feature::STANDARDIZED
            .iter()
            .map(|f| (f.name().to_string(), base.lookup_mean_var(f.name()).unwrap()))
            .collect();
        let modes = Feature::ALL
            .iter()
            .map(|f| (f.name().to_string(), base.lookup_mode(f.name()).unwrap().clone()))
            .collect();
        let tables = Arc::new(EncodingTables::from_parts(labels, stats, modes).unwrap());
        let err = DataPreprocessor::new(tables).unwrap_err();
        assert!(matches!(err, InferenceError::Config(_)));
    }
}
