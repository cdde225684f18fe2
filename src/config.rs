//! Configuration management and validation.
//!
//! Provides the layered configuration for dataset paths, manifest identity,
//! quality qualifier code sets, resolver table overrides and plausibility
//! ranges. Values come from built-in defaults, then an optional TOML file,
//! then CLI overrides.

use crate::app::models::Parameter;
use crate::constants::{
    self, DATA_DIR_NAME, DEFAULT_DATASET_NAME, DEFAULT_MANIFEST_VERSION, MANIFEST_FILENAME,
    RAW_DATA_DIR_NAME, VALIDATION_REPORT_FILENAME, qualifier_codes,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under the user config directory
const CONFIG_DIR_NAME: &str = "watershed-processor";

/// Config filename looked up in the user config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Top-level configuration for watershed processing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset root and raw payload locations
    pub paths: PathsConfig,

    /// Manifest identity
    pub dataset: DatasetConfig,

    /// Qualifier code sets driving quality tiers
    pub quality: QualityConfig,

    /// Additions and overrides for the resolver tables
    pub resolver: ResolverConfig,

    /// Plausibility range overrides
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Dataset root holding `data/`, `raw-data/` and `manifest.json`
    pub base_dir: PathBuf,

    /// Raw payload directory; defaults to `<base_dir>/raw-data`
    pub raw_data_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            raw_data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Dataset name written into a freshly initialised manifest
    pub name: String,

    /// Manifest format version
    pub version: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATASET_NAME.to_string(),
            version: DEFAULT_MANIFEST_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Qualifier codes mapping to `fair`
    pub fair_codes: Vec<String>,

    /// Qualifier codes mapping to `poor`
    pub poor_codes: Vec<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            fair_codes: qualifier_codes::FAIR_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            poor_codes: qualifier_codes::POOR_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }
}

/// Station table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    pub location_id: u32,
    pub location_name: String,
}

/// Resolver table entries layered on top of the built-in tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Source parameter code → canonical parameter
    pub parameters: BTreeMap<String, Parameter>,

    /// Station code → canonical location
    pub stations: BTreeMap<String, StationConfig>,
}

/// Inclusive plausible range for one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: f64,
    pub max: f64,
}

impl RangeConfig {
    /// Whether the value lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Parameter name → range, overriding the built-in ranges
    pub ranges: BTreeMap<String, RangeConfig>,
}

impl Config {
    /// Load configuration from an explicit file, the user config file, or defaults
    ///
    /// # Arguments
    ///
    /// * `path` - Explicit config file; it must exist when given
    ///
    /// # Returns
    ///
    /// The merged configuration, validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using built-in defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        debug!("Loaded config file {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default user config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
    }

    /// Override the dataset root
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.paths.base_dir = base_dir.into();
        self
    }

    /// Override the raw payload directory
    pub fn with_raw_data_dir(mut self, raw_data_dir: impl Into<PathBuf>) -> Self {
        self.paths.raw_data_dir = Some(raw_data_dir.into());
        self
    }

    /// Directory holding the category directories
    pub fn data_dir(&self) -> PathBuf {
        self.paths.base_dir.join(DATA_DIR_NAME)
    }

    /// Directory holding raw provider payloads
    pub fn raw_data_dir(&self) -> PathBuf {
        self.paths
            .raw_data_dir
            .clone()
            .unwrap_or_else(|| self.paths.base_dir.join(RAW_DATA_DIR_NAME))
    }

    /// Manifest file path
    pub fn manifest_path(&self) -> PathBuf {
        self.paths.base_dir.join(MANIFEST_FILENAME)
    }

    /// Validation report path
    pub fn validation_report_path(&self) -> PathBuf {
        self.paths.base_dir.join(VALIDATION_REPORT_FILENAME)
    }

    /// Built-in plausible ranges with configured overrides applied
    pub fn plausible_ranges(&self) -> Result<BTreeMap<Parameter, RangeConfig>> {
        let mut ranges = BTreeMap::new();

        for (name, min, max) in constants::DEFAULT_PLAUSIBLE_RANGES {
            let parameter: Parameter = name.parse()?;
            ranges.insert(parameter, RangeConfig { min: *min, max: *max });
        }

        for (name, range) in &self.validation.ranges {
            let parameter: Parameter = name.parse().map_err(|_| {
                Error::configuration(format!(
                    "Unknown parameter '{}' in [validation.ranges]",
                    name
                ))
            })?;
            ranges.insert(parameter, *range);
        }

        Ok(ranges)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.dataset.name.trim().is_empty() {
            return Err(Error::configuration("Dataset name cannot be empty"));
        }

        if self.dataset.version.trim().is_empty() {
            return Err(Error::configuration("Dataset version cannot be empty"));
        }

        if let Some(code) = self
            .quality
            .fair_codes
            .iter()
            .find(|code| self.quality.poor_codes.contains(code))
        {
            return Err(Error::configuration(format!(
                "Qualifier code '{}' is listed as both fair and poor",
                code
            )));
        }

        for (parameter, range) in self.plausible_ranges()? {
            if !(range.min <= range.max) {
                return Err(Error::configuration(format!(
                    "Invalid range for {}: min {} is greater than max {}",
                    parameter, range.min, range.max
                )));
            }
        }

        Ok(())
    }
}
