// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::{AppError, AppResult};
use super::validation::{validate_bool, validate_count};
use crate::table::TableOptions;

pub const SUCCESS_MESSAGES: &str = "success_messages";
pub const MAX_ROW_DISPLAY: &str = "max_row_display";

/// Runtime display options of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Emit human-readable progress and result notices
    pub success_messages: bool,
    /// Cap on rows shown by a preview
    pub max_row_display: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            success_messages: true,
            max_row_display: 10,
        }
    }
}

/// A single option as reported by `get_config`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigEntry {
    pub config: String,
    pub value: JsonValue,
}

impl DisplayConfig {
    /// Set an option by name, checking the value type
    pub fn set(&mut self, key: &str, value: &JsonValue) -> Result<(), String> {
        match key {
            SUCCESS_MESSAGES => self.success_messages = validate_bool(value, key)?,
            MAX_ROW_DISPLAY => self.max_row_display = validate_count(value, key)?,
            _ => return Err(format!("Unknown config '{}'", key)),
        }
        Ok(())
    }

    /// Get an option by name
    pub fn get(&self, key: &str) -> Result<ConfigEntry, String> {
        let value = match key {
            SUCCESS_MESSAGES => JsonValue::Bool(self.success_messages),
            MAX_ROW_DISPLAY => JsonValue::from(self.max_row_display),
            _ => return Err(format!("Unknown config '{}'", key)),
        };

        Ok(ConfigEntry {
            config: key.to_string(),
            value,
        })
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub table: TableOptions,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let config = match extension {
            "json" => serde_json::from_str(&contents)?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            _ => {
                return Err(AppError::Config(format!(
                    "Unsupported config file format: {}",
                    path.display()
                )))
            }
        };

        Ok(config)
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}
