//! # Configuration Management Module
//!
//! Persistent application settings stored in platform-appropriate locations.
//! Handles loading, saving, and providing defaults for configuration options.
//!
//! ## Settings
//! - `data_dir`: Where profile and measurements are stored (platform data dir when unset)
//! - `max_chart_months`: Horizon of the growth chart
//! - `plotted_percentiles`: Reference curves drawn on the chart
//! - `demo_batch_size`: Default size of a generated demo batch
//! - `weight_unit` / `length_unit`: Units for entering and displaying readings
//!
//! ## Storage Location
//! - macOS: ~/Library/Application Support/growth-tracker/config.toml
//! - Linux: ~/.config/growth-tracker/config.toml
//! - Windows: %APPDATA%\growth-tracker\config.toml

use crate::error::ConfigError;
use crate::series::{DEFAULT_MAX_MONTHS, PERCENTILES_TO_PLOT};
use crate::units::{LengthUnit, WeightUnit};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "growth-tracker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub max_chart_months: u32,
    pub plotted_percentiles: Vec<u8>,
    pub demo_batch_size: usize,
    pub weight_unit: WeightUnit,
    pub length_unit: LengthUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_chart_months: DEFAULT_MAX_MONTHS,
            plotted_percentiles: PERCENTILES_TO_PLOT.to_vec(),
            demo_batch_size: 50,
            weight_unit: WeightUnit::Kg,
            length_unit: LengthUnit::Cm,
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Directory holding the persisted profile and measurements
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Load config from the default location, or create default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing defaults there when the file is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = toml::from_str(&contents).map_err(ConfigError::ParseFailed)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File doesn't exist, create default
                let config = Self::default();
                config.save_to(path)?;
                log::info!("Created default config at {}", path.display());
                Ok(config)
            }
            Err(e) => Err(ConfigError::ReadFailed(e)),
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(path, toml_string).map_err(ConfigError::WriteFailed)?;

        Ok(())
    }
}
