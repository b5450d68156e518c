//! Device ids per family, as configured for one dashboard.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::SettingsError;
use crate::series::weather::{check_labels, CHANNELS};

/// Largest number of auxiliary weather channel labels.
pub const MAX_WEATHER_LABELS: usize = CHANNELS;

/// Device ids per family. Empty lists leave the family out of every panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Devices {
    pub solars: Vec<u32>,
    pub generators: Vec<u32>,
    pub heatpumps: Vec<u32>,
    pub batteries: Vec<u32>,
    pub meters: Vec<u32>,
    pub wallboxes: Vec<u32>,
    pub weathers: Vec<u32>,
    pub boilers: Vec<u32>,
    pub bidir_meters: Vec<u32>,

    /// Labels of weather channels 1 to 7; an empty label hides its channel.
    /// Labels become quoted output aliases, so they must be distinct, must
    /// not repeat a weather column name and must not contain `$__`.
    pub weather_labels: Vec<String>,
}

impl Devices {
    /// Family lists by configuration key.
    pub fn families(&self) -> [(&'static str, &[u32]); 9] {
        [
            ("solars", self.solars.as_slice()),
            ("generators", self.generators.as_slice()),
            ("heatpumps", self.heatpumps.as_slice()),
            ("batteries", self.batteries.as_slice()),
            ("meters", self.meters.as_slice()),
            ("wallboxes", self.wallboxes.as_slice()),
            ("weathers", self.weathers.as_slice()),
            ("boilers", self.boilers.as_slice()),
            ("bidir_meters", self.bidir_meters.as_slice()),
        ]
    }

    /// True when no family has any device.
    pub fn is_empty(&self) -> bool {
        self.families().iter().all(|(_, ids)| ids.is_empty())
    }

    /// Check the limits query composition relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.weather_labels.len() > MAX_WEATHER_LABELS {
            return Err(SettingsError::InvalidConfig(format!(
                "weather_labels has {} entries, at most {} are supported",
                self.weather_labels.len(),
                MAX_WEATHER_LABELS
            )));
        }
        check_labels(&self.weather_labels)
            .map_err(|e| SettingsError::InvalidConfig(e.to_string()))?;

        for (key, ids) in self.families() {
            let mut seen = HashSet::new();
            if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
                return Err(SettingsError::InvalidConfig(format!(
                    "{key} lists device {dup} more than once"
                )));
            }
        }
        Ok(())
    }
}
