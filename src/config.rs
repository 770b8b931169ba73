//! Analysis options.
//!
//! Every field has a default, so an empty TOML document (or no config file
//! at all) yields [`AnalysisConfig::default`].

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

type Result<T> = core::result::Result<T, ConfigError>;

/// Options for the grouped pairwise-difference statistic and the checks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Inclusive lower bound on the filtered field; rows below it are
    /// dropped before grouping.
    pub min_valid_value: f64,
    /// Smallest group that contributes differences. Values below 2 are
    /// treated as 2, since a single value has no pairs.
    pub min_group_size: usize,
    /// Absolute tolerance for the moment parity checks.
    pub tolerance: f64,
    /// Expected respondent table shape, if it should be checked.
    pub expected: Option<ExpectedCounts>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_valid_value: 37.0,
            min_group_size: 2,
            tolerance: 1e-9,
            expected: None,
        }
    }
}

/// Known facts about the respondent table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpectedCounts {
    /// Expected number of respondent records.
    pub records: Option<usize>,
    /// Expected `pregnum` value counts.
    pub value_counts: Vec<ExpectedValueCount>,
}

/// "`value` occurs exactly `count` times".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedValueCount {
    pub value: f64,
    pub count: usize,
}

impl AnalysisConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded analysis config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_valid_value.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "min_valid_value must be finite, got {}",
                self.min_valid_value
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Group size actually applied when aggregating differences.
    pub fn effective_min_group_size(&self) -> usize {
        self.min_group_size.max(2)
    }
}
