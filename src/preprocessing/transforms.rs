//! Per-feature transformations
//!
//! Bucketing of age and weekly hours into bands, label encoding and
//! standardization. All functions are pure given the encoding tables.

use crate::error::{Result, ValidationError};
use std::fmt;

use super::{EncodingTables, FeatureValue};

/// Weekly working time band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkTimeCategory {
    /// Up to and including 20 hours
    PartTime,
    /// Over 20, up to and including 40 hours
    FullTime,
    /// Over 40, up to and including 60 hours
    OverTime,
    /// Over 60 hours
    HardTime,
}

impl WorkTimeCategory {
    pub fn from_hours(hours: f64) -> Self {
        if hours <= 20.0 {
            WorkTimeCategory::PartTime
        } else if hours <= 40.0 {
            WorkTimeCategory::FullTime
        } else if hours <= 60.0 {
            WorkTimeCategory::OverTime
        } else {
            WorkTimeCategory::HardTime
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkTimeCategory::PartTime => "Part-time",
            WorkTimeCategory::FullTime => "Full-time",
            WorkTimeCategory::OverTime => "Over-time",
            WorkTimeCategory::HardTime => "Hard-time",
        }
    }
}

impl fmt::Display for WorkTimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Age band. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
    Under20,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    Sixties,
    SeventyPlus,
}

impl AgeGroup {
    pub fn from_age(age: f64) -> Self {
        if age < 20.0 {
            AgeGroup::Under20
        } else if age < 30.0 {
            AgeGroup::Twenties
        } else if age < 40.0 {
            AgeGroup::Thirties
        } else if age < 50.0 {
            AgeGroup::Forties
        } else if age < 60.0 {
            AgeGroup::Fifties
        } else if age < 70.0 {
            AgeGroup::Sixties
        } else {
            AgeGroup::SeventyPlus
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under20 => "0-20",
            AgeGroup::Twenties => "20-30",
            AgeGroup::Thirties => "30-40",
            AgeGroup::Forties => "40-50",
            AgeGroup::Fifties => "50-60",
            AgeGroup::Sixties => "60-70",
            AgeGroup::SeventyPlus => "70+",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Work time band label for a number of weekly hours
pub fn work_time_category(hours: f64) -> &'static str {
    WorkTimeCategory::from_hours(hours).label()
}

/// Age band label for an age in years
pub fn age_group(age: f64) -> &'static str {
    AgeGroup::from_age(age).label()
}

/// The record's value, or the feature's mode when missing.
///
/// Every feature kind goes through this before its own transform.
pub fn resolve_or_default<'a>(
    value: Option<&'a FeatureValue>,
    feature: &str,
    tables: &'a EncodingTables,
) -> Result<&'a FeatureValue> {
    match value {
        Some(v) if !v.is_blank() => Ok(v),
        _ => tables.lookup_mode(feature),
    }
}

/// Coerce a value to a number, reporting the feature on failure
pub fn to_number(value: &FeatureValue, feature: &str) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        ValidationError::BadNumericValue {
            feature: feature.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

/// Code of an already-resolved label
pub fn encode_label(label: &str, feature: &str, tables: &EncodingTables) -> Result<f64> {
    tables.lookup(feature, label).map(f64::from)
}

/// Label-encode a raw value, imputing the mode when missing
pub fn encode_categorical(
    value: Option<&FeatureValue>,
    feature: &str,
    tables: &EncodingTables,
) -> Result<f64> {
    let resolved = resolve_or_default(value, feature, tables)?;
    encode_label(&resolved.as_label(), feature, tables)
}

/// Resolve a raw value (or the mode) to a plain number
pub fn numeric(value: Option<&FeatureValue>, feature: &str, tables: &EncodingTables) -> Result<f64> {
    to_number(resolve_or_default(value, feature, tables)?, feature)
}

/// Standardize a raw value, imputing the mode when missing
pub fn standardize(
    value: Option<&FeatureValue>,
    feature: &str,
    tables: &EncodingTables,
) -> Result<f64> {
    let x = numeric(value, feature, tables)?;
    Ok(tables.lookup_mean_var(feature)?.apply(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_time_boundaries() {
        assert_eq!(work_time_category(0.0), "Part-time");
        assert_eq!(work_time_category(20.0), "Part-time");
        assert_eq!(work_time_category(20.5), "Full-time");
        assert_eq!(work_time_category(40.0), "Full-time");
        assert_eq!(work_time_category(41.0), "Over-time");
        assert_eq!(work_time_category(60.0), "Over-time");
        assert_eq!(work_time_category(61.0), "Hard-time");
    }

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(age_group(19.0), "0-20");
        assert_eq!(age_group(20.0), "20-30");
        assert_eq!(age_group(29.9), "20-30");
        assert_eq!(age_group(45.0), "40-50");
        assert_eq!(age_group(69.0), "60-70");
        assert_eq!(age_group(70.0), "70+");
        assert_eq!(age_group(95.0), "70+");
    }

    #[test]
    fn test_to_number_reports_feature() {
        let err = to_number(&FeatureValue::from("n/a"), "capital-gain").unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::BadNumericValue {
                feature: "capital-gain".to_string(),
                value: "n/a".to_string(),
            })
        );
        assert_eq!(to_number(&FeatureValue::from("12.5"), "fnlwgt").unwrap(), 12.5);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(WorkTimeCategory::HardTime.to_string(), "Hard-time");
        assert_eq!(AgeGroup::SeventyPlus.to_string(), "70+");
    }
}
