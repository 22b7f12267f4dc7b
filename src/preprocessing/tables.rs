//! Static encoding tables: label vocabularies, standardization statistics
//! and imputation modes.
//!
//! Built once at startup and shared read-only for the process lifetime.

use crate::error::{InferenceError, Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use super::{Feature, FeatureValue, AGE_GROUP, WORK_TIME_CATEGORY};

/// File name of the label vocabulary inside a model docs directory
pub const LABEL_MAPPINGS_FILE: &str = "label_mappings.json";
/// File name of the standardization statistics
pub const STANDARD_SCALER_FILE: &str = "standard_scaler.json";
/// File name of the imputation modes
pub const MODE_VALUES_FILE: &str = "mode_values.json";

const MEAN_SUFFIX: &str = "_mean";
const VAR_SUFFIX: &str = "_var";

/// Population statistics for one standardized feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardStats {
    pub mean: f64,
    pub variance: f64,
}

impl StandardStats {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    /// (x - mean) / sqrt(variance)
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.variance.sqrt()
    }
}

/// The three read-only lookup tables the pipeline depends on
#[derive(Debug, Clone)]
pub struct EncodingTables {
    labels: HashMap<String, HashMap<String, u32>>,
    stats: HashMap<String, StandardStats>,
    modes: HashMap<String, FeatureValue>,
}

impl EncodingTables {
    /// Build tables from in-memory maps, running the startup checks
    pub fn from_parts(
        labels: HashMap<String, HashMap<String, u32>>,
        stats: HashMap<String, StandardStats>,
        modes: HashMap<String, FeatureValue>,
    ) -> Result<Self> {
        let tables = Self { labels, stats, modes };
        tables.validate()?;
        Ok(tables)
    }

    /// Load tables from three JSON documents
    pub fn load(
        label_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
        mode_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let labels: HashMap<String, HashMap<String, u32>> = read_json(label_path.as_ref())?;
        let flat_stats: HashMap<String, f64> = read_json(scaler_path.as_ref())?;
        let modes: HashMap<String, FeatureValue> = read_json(mode_path.as_ref())?;

        let tables = Self::from_parts(labels, parse_flat_stats(&flat_stats)?, modes)?;
        info!(
            label_tables = tables.labels.len(),
            standardized = tables.stats.len(),
            modes = tables.modes.len(),
            "Encoding tables loaded"
        );
        Ok(tables)
    }

    /// Load tables from a directory holding the three standard file names
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Self::load(
            dir.join(LABEL_MAPPINGS_FILE),
            dir.join(STANDARD_SCALER_FILE),
            dir.join(MODE_VALUES_FILE),
        )
    }

    /// Code of `label` in the vocabulary of `feature`
    pub fn lookup(&self, feature: &str, label: &str) -> Result<u32> {
        let table = self.labels.get(feature).ok_or_else(|| {
            InferenceError::Config(format!("no label table for feature '{}'", feature))
        })?;
        table.get(label).copied().ok_or_else(|| {
            ValidationError::UnknownCategory {
                feature: feature.to_string(),
                value: label.to_string(),
            }
            .into()
        })
    }

    /// Standardization statistics of `feature`
    pub fn lookup_mean_var(&self, feature: &str) -> Result<StandardStats> {
        self.stats.get(feature).copied().ok_or_else(|| {
            InferenceError::Config(format!("no mean/variance for feature '{}'", feature))
        })
    }

    /// Imputation fallback of `feature`
    pub fn lookup_mode(&self, feature: &str) -> Result<&FeatureValue> {
        self.modes
            .get(feature)
            .ok_or_else(|| InferenceError::Config(format!("no mode value for feature '{}'", feature)))
    }

    /// Vocabulary of a feature, if one exists
    pub fn label_table(&self, feature: &str) -> Option<&HashMap<String, u32>> {
        self.labels.get(feature)
    }

    /// Names of all label tables, sorted
    pub fn label_features(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn validate(&self) -> Result<()> {
        let encoded = [AGE_GROUP, WORK_TIME_CATEGORY]
            .into_iter()
            .chain(Feature::CATEGORICAL.iter().map(|f| f.name()));

        for name in encoded {
            let table = self.labels.get(name).ok_or_else(|| {
                InferenceError::Config(format!("label mappings missing table '{}'", name))
            })?;
            let mut seen = HashSet::with_capacity(table.len());
            for (label, code) in table {
                if !seen.insert(*code) {
                    return Err(InferenceError::Config(format!(
                        "duplicate code {} in table '{}' (label '{}')",
                        code, name, label
                    )));
                }
            }
        }

        for feature in Feature::STANDARDIZED {
            self.lookup_mean_var(feature.name())?;
        }

        for feature in Feature::ALL {
            let mode = self.lookup_mode(feature.name())?;
            if feature.is_numeric() && mode.as_f64().is_none() {
                return Err(InferenceError::Config(format!(
                    "mode value '{}' for numeric feature '{}' is not a number",
                    mode, feature
                )));
            }
        }

        for feature in Feature::CATEGORICAL {
            let mode = self.lookup_mode(feature.name())?.as_label();
            if !self.labels[feature.name()].contains_key(&mode) {
                return Err(InferenceError::Config(format!(
                    "mode value '{}' missing from label table '{}'",
                    mode, feature
                )));
            }
        }

        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| {
        InferenceError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        InferenceError::Config(format!("failed to parse {}: {}", path.display(), e))
    })
}

/// Split `{"<feature>_mean": m, "<feature>_var": v}` into per-feature stats
fn parse_flat_stats(flat: &HashMap<String, f64>) -> Result<HashMap<String, StandardStats>> {
    let mut stats = HashMap::new();
    for (key, mean) in flat {
        let Some(feature) = key.strip_suffix(MEAN_SUFFIX) else {
            continue;
        };
        let var_key = format!("{}{}", feature, VAR_SUFFIX);
        let variance = flat.get(&var_key).copied().ok_or_else(|| {
            InferenceError::Config(format!("standardization is missing '{}'", var_key))
        })?;
        stats.insert(feature.to_string(), StandardStats::new(*mean, variance));
    }
    Ok(stats)
}
