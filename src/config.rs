//! Configuration management for Chargewise
//!
//! This module handles loading, validation, and saving of the YAML
//! configuration. The battery parameters live here exactly once; everything
//! derived from them (effective capacity, loss factor) is computed on demand.

mod defaults;

use crate::energy::BatteryConfiguration;
use crate::error::{ChargewiseError, Result};
use crate::logging::parse_log_level;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Accepted battery capacity in kWh
pub const CAPACITY_KWH_RANGE: RangeInclusive<f64> = 10.0..=200.0;

/// Accepted state of health in percent
pub const STATE_OF_HEALTH_RANGE: RangeInclusive<f64> = 50.0..=100.0;

/// Accepted charge loss in percent
pub const CHARGE_LOSS_RANGE: RangeInclusive<f64> = 5.0..=25.0;

/// Configuration file looked up in the working directory first
pub const DEFAULT_CONFIG_FILE: &str = "chargewise.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Battery model parameters
    pub battery: BatteryConfiguration,

    /// Charging station integration
    pub charger: ChargerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Path of the JSON file holding SOC values and the last connection status
    pub state_file: String,
}

/// Charging station connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargerConfig {
    /// Whether charger control is enabled at all
    pub enabled: bool,

    /// IP address or hostname of the charger on the local network
    pub address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional override for the console layer
    pub console_level: Option<String>,

    /// Optional override for the file layer
    pub file_level: Option<String>,

    /// Path to log file (its directory receives daily rotated files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to the console (stderr)
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Candidate configuration files, in lookup order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(Path::new(&home).join(".config/chargewise/config.yaml"));
        }
        paths.push(PathBuf::from("/etc/chargewise/config.yaml"));
        paths
    }

    /// Load the first existing default configuration file.
    ///
    /// Returns the configuration with the file it came from. Without any file,
    /// defaults are paired with the first candidate so a later save lands there.
    pub fn load() -> Result<(Self, PathBuf)> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing file among `candidates`
    pub fn load_first(candidates: &[PathBuf]) -> Result<(Self, PathBuf)> {
        match candidates.iter().find(|p| p.exists()) {
            Some(path) => Ok((Self::from_file(path)?, path.clone())),
            None => {
                let path = candidates
                    .first()
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                Ok((Config::default(), path))
            }
        }
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        check_range(
            "battery.capacity_kwh",
            self.battery.capacity_kwh,
            &CAPACITY_KWH_RANGE,
        )?;
        check_range(
            "battery.state_of_health_percent",
            self.battery.state_of_health_percent,
            &STATE_OF_HEALTH_RANGE,
        )?;
        check_range(
            "battery.charge_loss_percent",
            self.battery.charge_loss_percent,
            &CHARGE_LOSS_RANGE,
        )?;

        if self.charger.enabled && self.charger.address.trim().is_empty() {
            return Err(ChargewiseError::validation(
                "charger.address",
                "IP address cannot be empty when the charger is enabled",
            ));
        }

        parse_log_level(&self.logging.level)
            .map_err(|e| ChargewiseError::validation("logging.level", e.to_string()))?;

        if self.state_file.trim().is_empty() {
            return Err(ChargewiseError::validation(
                "state_file",
                "Path cannot be empty",
            ));
        }

        Ok(())
    }
}

fn check_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ChargewiseError::validation(
        field,
        format!(
            "Must be between {} and {}, got {}",
            range.start(),
            range.end(),
            value
        ),
    ))
}
