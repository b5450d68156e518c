//! Solar inverters.

use super::{Family, FieldDef, Quantity};
use crate::sql::{Field, Query};

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Power, "power_w"),
    FieldDef::column(Quantity::Energy, "energy_wh"),
    FieldDef::new(Quantity::DEnergy, "MAX(energy_wh) - MIN(energy_wh)", "d_energy_wh"),
];

pub static SOLAR: Family = Family::new("solar", "solar", CATALOG);

/// Query factories for solar inverters.
pub struct Solar;

impl Solar {
    pub fn ps_power(ids: &[u32]) -> Field {
        SOLAR.ps(ids, Quantity::Power, Some(&SOLAR.combined_alias("power_w")))
    }

    pub fn pd_energy(ids: &[u32]) -> Field {
        SOLAR.pd(ids, Quantity::Energy, Some(&SOLAR.combined_alias("d_energy_wh")))
    }

    /// Output power of each inverter.
    pub fn query_power(ids: &[u32]) -> Query {
        SOLAR.query_each(ids, &[Quantity::Power])
    }

    /// Combined output power.
    pub fn query_power_sum(ids: &[u32]) -> Query {
        SOLAR.query_sum(ids, Quantity::Power)
    }

    /// Energy yield of each inverter over the selected window.
    pub fn query_denergy(ids: &[u32]) -> Query {
        SOLAR.query_delta(ids, Quantity::DEnergy)
    }

    /// Combined energy yield over the selected window.
    pub fn query_denergy_sum(ids: &[u32]) -> Query {
        SOLAR.query_delta_sum(ids, Quantity::DEnergy)
    }
}
