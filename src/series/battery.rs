//! Home batteries. Power is positive while charging.

use super::{Family, FieldDef, Quantity};
use crate::sql::{Field, Query};

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Power, "power_w"),
    FieldDef::column(Quantity::Charge, "charge_wh"),
    FieldDef::column(Quantity::Level, "level_pct"),
];

pub static BATTERY: Family = Family::new("battery", "battery", CATALOG);

/// Query factories for batteries.
pub struct Battery;

impl Battery {
    pub fn ps_power(ids: &[u32]) -> Field {
        BATTERY.ps(ids, Quantity::Power, Some(&BATTERY.combined_alias("power_w")))
    }

    /// Stored charge of each battery.
    pub fn query_charge(ids: &[u32]) -> Query {
        BATTERY.query_each(ids, &[Quantity::Charge])
    }

    /// Charge level of each battery.
    pub fn query_level(ids: &[u32]) -> Query {
        BATTERY.query_each(ids, &[Quantity::Level])
    }

    /// Charging power of each battery.
    pub fn query_power(ids: &[u32]) -> Query {
        BATTERY.query_each(ids, &[Quantity::Power])
    }

    /// Combined charging power.
    pub fn query_power_sum(ids: &[u32]) -> Query {
        BATTERY.query_sum(ids, Quantity::Power)
    }
}
