//! TOML-based configuration for kilowatt.
//!
//! Supports a config file (kilowatt.toml) with environment variable expansion
//! in the time range.
//!
//! Example configuration:
//! ```toml
//! [devices]
//! solars = [1, 8]
//! generators = [2]
//! heatpumps = [7]
//! meters = [1]
//! weathers = [1]
//! weather_labels = ["Garage", "", "Attic"]
//!
//! [time_range]  # only used to expand host placeholders
//! from = "2024-01-01T00:00:00Z"
//! to = "${DASHBOARD_TO}"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::devices::Devices;
use crate::sql::{MacroError, TimeRange};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(#[from] MacroError),

    #[error("No [time_range] configured")]
    NoTimeRange,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Device ids per family.
    pub devices: Devices,

    /// Concrete range for expanding host placeholders.
    pub time_range: Option<TimeRangeSettings>,
}

/// `[time_range]` table: RFC 3339 bounds, `${VAR}` expanded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeRangeSettings {
    pub from: String,
    pub to: String,
}

impl TimeRangeSettings {
    /// Expand environment variables and parse both bounds.
    pub fn resolve(&self) -> Result<TimeRange, SettingsError> {
        let from = expand_env_vars(&self.from)?;
        let to = expand_env_vars(&self.to)?;
        Ok(TimeRange::parse(&from, &to)?)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `KILOWATT_CONFIG`
    /// 2. `./kilowatt.toml`
    /// 3. `~/.config/kilowatt/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        // Check environment variable first
        if let Ok(path) = env::var("KILOWATT_CONFIG") {
            return Self::from_file(&path);
        }

        // Check local directory
        let local_config = PathBuf::from("kilowatt.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("kilowatt").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Validate device lists and, when present, the time range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.devices.validate()?;
        if let Some(range) = &self.time_range {
            range.resolve()?;
        }
        Ok(())
    }

    /// The configured time range, resolved.
    pub fn time_range(&self) -> Result<TimeRange, SettingsError> {
        self.time_range
            .as_ref()
            .ok_or(SettingsError::NoTimeRange)?
            .resolve()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        while let Some(ch) = chars.next_if(|ch| {
            if braced {
                *ch != '}'
            } else {
                ch.is_alphanumeric() || *ch == '_'
            }
        }) {
            var_name.push(ch);
        }
        if braced {
            chars.next_if_eq(&'}');
        }

        if var_name.is_empty() && !braced {
            // Just a lone $, keep it
            result.push('$');
            continue;
        }
        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
