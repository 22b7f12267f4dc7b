//! Preprocessing configuration

use crate::error::{InferenceError, Result};
use serde::{Deserialize, Serialize};

/// Largest tolerated share of missing canonical features
pub const DEFAULT_MAX_MISSING_RATIO: f64 = 0.2;

/// Configuration for record preprocessing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Records whose missing-feature ratio strictly exceeds this are rejected
    pub max_missing_ratio: f64,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            max_missing_ratio: DEFAULT_MAX_MISSING_RATIO,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the missing value threshold
    pub fn with_max_missing_ratio(mut self, ratio: f64) -> Self {
        self.max_missing_ratio = ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.max_missing_ratio) {
            return Err(InferenceError::Config(format!(
                "max_missing_ratio must be within [0, 1], got {}",
                self.max_missing_ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreprocessingConfig::default();
        assert_eq!(config.max_missing_ratio, 0.2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PreprocessingConfig::new().with_max_missing_ratio(0.5);
        assert_eq!(config.max_missing_ratio, 0.5);
        assert!(PreprocessingConfig::new().with_max_missing_ratio(1.5).validate().is_err());
        assert!(PreprocessingConfig::new().with_max_missing_ratio(f64::NAN).validate().is_err());
    }
}
