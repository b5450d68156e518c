//! Combined heat and power generators.
//!
//! Generators meter electrical output only. Heat is derived from it with a
//! fixed conversion factor, see [`HEAT_FACTOR`].

use super::{Family, FieldDef, Quantity};
use crate::proxy::ProxyField;
use crate::sql::{Field, Query};

/// Heat produced per unit of electrical output.
///
/// `(1 - η_el) / η_el × f_Hs/Hi` with electrical efficiency `η_el = 0.138`
/// and gross/net calorific ratio `f = 1.11`, rounded to the literal the
/// dashboards have always emitted. The expressions below must carry this
/// exact text.
pub const HEAT_FACTOR: f64 = 6.93348;

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Power, "power_w"),
    FieldDef::column(Quantity::Energy, "energy_wh"),
    FieldDef::new(Quantity::Heat, "power_w * 6.93348", "heat_w"),
    FieldDef::new(Quantity::HeatEnergy, "energy_wh * 6.93348", "heat_wh"),
    FieldDef::new(Quantity::DEnergy, "MAX(energy_wh) - MIN(energy_wh)", "d_energy_wh"),
    FieldDef::new(
        Quantity::DHeat,
        "(MAX(energy_wh) - MIN(energy_wh)) * 6.93348",
        "d_heat_wh",
    ),
];

pub static GENERATOR: Family = Family::new("generator", "generator", CATALOG);

/// Query factories for generators.
pub struct Generator;

impl Generator {
    pub fn ps_power(ids: &[u32]) -> Field {
        GENERATOR.ps(ids, Quantity::Power, Some(&GENERATOR.combined_alias("power_w")))
    }

    pub fn ps_heat(ids: &[u32]) -> Field {
        GENERATOR.ps(ids, Quantity::Heat, Some(&GENERATOR.combined_alias("heat_w")))
    }

    /// Electrical output of each generator.
    pub fn query_power(ids: &[u32]) -> Query {
        GENERATOR.query_each(ids, &[Quantity::Power])
    }

    /// Combined electrical output.
    pub fn query_power_sum(ids: &[u32]) -> Query {
        GENERATOR.query_sum(ids, Quantity::Power)
    }

    /// Heat of each generator and, with several generators, the combined
    /// heat as `"generator.heat_w"`.
    pub fn query_heat(ids: &[u32]) -> Query {
        if ids.len() < 2 {
            return GENERATOR.query_each(ids, &[Quantity::Heat]);
        }
        GENERATOR
            .proxy(ids, &[Quantity::Heat])
            .field(ProxyField::new(Self::ps_heat(ids)))
            .into_query()
    }

    /// Combined electrical energy over the selected window.
    pub fn query_denergy_sum(ids: &[u32]) -> Query {
        GENERATOR.query_delta_sum(ids, Quantity::DEnergy)
    }

    /// Combined heat over the selected window.
    pub fn query_dheat_sum(ids: &[u32]) -> Query {
        GENERATOR.query_delta_sum(ids, Quantity::DHeat)
    }
}
