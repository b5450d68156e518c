//! Weather stations: outdoor sensors plus up to seven auxiliary temperature
//! channels, each shown under a free-text label.

use std::collections::HashSet;

use super::{Family, FieldDef, Quantity};
use crate::sql::Query;

/// Number of auxiliary temperature channels a station carries.
pub const CHANNELS: usize = 7;

/// A channel label set that would not render to distinct output columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("weather stations carry {max} temperature channels, got {0} labels", max = CHANNELS)]
    TooMany(usize),

    #[error("weather label '{0}' is used more than once")]
    Duplicate(String),

    #[error("weather label '{0}' collides with a weather column name")]
    Reserved(String),

    /// Host placeholders are expanded anywhere in the statement text,
    /// quoted identifiers included.
    #[error("weather label '{0}' contains a host placeholder prefix '$__'")]
    Placeholder(String),
}

/// Check channel labels before they become output aliases: at most
/// [`CHANNELS`], non-blank labels unique after trimming, none equal to a
/// catalog alias, none carrying `$__`.
pub fn check_labels(labels: &[String]) -> Result<(), LabelError> {
    if labels.len() > CHANNELS {
        return Err(LabelError::TooMany(labels.len()));
    }

    let mut seen = HashSet::new();
    for label in labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if label.contains("$__") {
            return Err(LabelError::Placeholder(label.to_string()));
        }
        if CATALOG.iter().any(|def| def.alias == label) {
            return Err(LabelError::Reserved(label.to_string()));
        }
        if !seen.insert(label) {
            return Err(LabelError::Duplicate(label.to_string()));
        }
    }
    Ok(())
}

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Temperature, "temp_c"),
    FieldDef::column(Quantity::Humidity, "humidity_pct"),
    FieldDef::column(Quantity::Rain, "rain_mm"),
    FieldDef::column(Quantity::Wind, "wind_ms"),
    FieldDef::column(Quantity::Channel(1), "temp1_c"),
    FieldDef::column(Quantity::Channel(2), "temp2_c"),
    FieldDef::column(Quantity::Channel(3), "temp3_c"),
    FieldDef::column(Quantity::Channel(4), "temp4_c"),
    FieldDef::column(Quantity::Channel(5), "temp5_c"),
    FieldDef::column(Quantity::Channel(6), "temp6_c"),
    FieldDef::column(Quantity::Channel(7), "temp7_c"),
];

pub static WEATHER: Family = Family::new("weather", "weather", CATALOG);

/// Query factories for weather stations.
pub struct Weather;

impl Weather {
    /// Outdoor temperature plus every auxiliary channel with a non-empty
    /// label, in channel order. Channel `n` is exposed as `"weather<id>.<label n>"`.
    ///
    /// # Panics
    ///
    /// When [`check_labels`] rejects `labels`.
    pub fn query_temps(ids: &[u32], labels: &[String]) -> Query {
        if let Err(e) = check_labels(labels) {
            panic!("{e}");
        }

        let mut channels = vec![(Quantity::Temperature, None)];
        channels.extend(
            labels
                .iter()
                .zip(1u8..)
                .filter(|(label, _)| !label.trim().is_empty())
                .map(|(label, n)| (Quantity::Channel(n), Some(label.trim().to_string()))),
        );
        WEATHER.query_labelled(ids, &channels)
    }

    pub fn query_humidity(ids: &[u32]) -> Query {
        WEATHER.query_each(ids, &[Quantity::Humidity])
    }

    pub fn query_rain(ids: &[u32]) -> Query {
        WEATHER.query_each(ids, &[Quantity::Rain])
    }

    pub fn query_wind(ids: &[u32]) -> Query {
        WEATHER.query_each(ids, &[Quantity::Wind])
    }
}
