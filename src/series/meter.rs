//! Grid meters and single-direction sub-meters.
//!
//! A [`SimpleMeter`] is any meter with power and a cumulative energy counter;
//! wallboxes are simple meters on their own table.

use super::{Family, FieldDef, Quantity};
use crate::sql::{Field, Query};

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Power, "power_w"),
    FieldDef::column(Quantity::Energy, "energy_wh"),
    FieldDef::new(Quantity::DEnergy, "MAX(energy_wh) - MIN(energy_wh)", "d_energy_wh"),
];

/// Grid meter; power is positive while importing.
pub static METER: Family = Family::new("meter", "meter", CATALOG);

/// Car charger.
pub static WALLBOX: Family = SimpleMeter::family("wallbox", "wallbox");

/// Factories shared by every single-direction meter family.
pub struct SimpleMeter;

impl SimpleMeter {
    /// A meter family on `table`, staged as `<basename><id>`.
    pub const fn family(basename: &'static str, table: &'static str) -> Family {
        Family::new(basename, table, CATALOG)
    }

    pub fn ps_power(family: &'static Family, ids: &[u32]) -> Field {
        family.ps(ids, Quantity::Power, Some(&family.combined_alias("power_w")))
    }

    pub fn query_power(family: &'static Family, ids: &[u32]) -> Query {
        family.query_each(ids, &[Quantity::Power])
    }

    pub fn query_power_sum(family: &'static Family, ids: &[u32]) -> Query {
        family.query_sum(ids, Quantity::Power)
    }

    pub fn query_denergy(family: &'static Family, ids: &[u32]) -> Query {
        family.query_delta(ids, Quantity::DEnergy)
    }

    pub fn query_denergy_sum(family: &'static Family, ids: &[u32]) -> Query {
        family.query_delta_sum(ids, Quantity::DEnergy)
    }
}

/// Query factories for grid meters.
pub struct Meter;

impl Meter {
    pub fn ps_power(ids: &[u32]) -> Field {
        SimpleMeter::ps_power(&METER, ids)
    }

    pub fn query_power(ids: &[u32]) -> Query {
        SimpleMeter::query_power(&METER, ids)
    }

    pub fn query_power_sum(ids: &[u32]) -> Query {
        SimpleMeter::query_power_sum(&METER, ids)
    }

    pub fn query_denergy_sum(ids: &[u32]) -> Query {
        SimpleMeter::query_denergy_sum(&METER, ids)
    }
}

/// Query factories for wallboxes.
pub struct Wallbox;

impl Wallbox {
    pub fn ps_power(ids: &[u32]) -> Field {
        SimpleMeter::ps_power(&WALLBOX, ids)
    }

    pub fn query_power(ids: &[u32]) -> Query {
        SimpleMeter::query_power(&WALLBOX, ids)
    }

    pub fn query_power_sum(ids: &[u32]) -> Query {
        SimpleMeter::query_power_sum(&WALLBOX, ids)
    }

    pub fn query_denergy(ids: &[u32]) -> Query {
        SimpleMeter::query_denergy(&WALLBOX, ids)
    }

    pub fn query_denergy_sum(ids: &[u32]) -> Query {
        SimpleMeter::query_denergy_sum(&WALLBOX, ids)
    }
}
