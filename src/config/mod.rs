//! Configuration module for kilowatt.
//!
//! Handles the device configuration file and environment variables.

mod devices;
mod settings;

pub use devices::{Devices, MAX_WEATHER_LABELS};
pub use settings::{expand_env_vars, Settings, SettingsError, TimeRangeSettings};
