//! Heat pumps.
//!
//! The table stores COP in percent (`cop_pct`); the catalog scales it to a
//! ratio, so a working heat pump reports a COP above 1.

use super::{Family, FieldDef, Quantity};
use crate::proxy::ProxyField;
use crate::sql::{Field, Query};

/// A COP at or below this ratio marks a source as idle or invalid when averaging.
pub const COP_VALID_ABOVE: &str = "1";

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Power, "power_w"),
    FieldDef::column(Quantity::Energy, "energy_wh"),
    FieldDef::new(Quantity::Heat, "power_w * cop_pct / 100.0", "heat_w"),
    FieldDef::column(Quantity::HeatEnergy, "heat_wh"),
    FieldDef::new(Quantity::Cop, "cop_pct / 100.0", "cop"),
    FieldDef::new(Quantity::DEnergy, "MAX(energy_wh) - MIN(energy_wh)", "d_energy_wh"),
    FieldDef::new(Quantity::DHeat, "MAX(heat_wh) - MIN(heat_wh)", "d_heat_wh"),
];

pub static HEATPUMP: Family = Family::new("heatpump", "heatpump", CATALOG);

/// Query factories for heat pumps.
pub struct Heatpump;

impl Heatpump {
    pub fn ps_power(ids: &[u32]) -> Field {
        HEATPUMP.ps(ids, Quantity::Power, Some(&HEATPUMP.combined_alias("power_w")))
    }

    pub fn ps_heat(ids: &[u32]) -> Field {
        HEATPUMP.ps(ids, Quantity::Heat, Some(&HEATPUMP.combined_alias("heat_w")))
    }

    /// Average COP over the heat pumps currently running.
    pub fn pa_cop(ids: &[u32]) -> Field {
        HEATPUMP.pa(
            ids,
            Quantity::Cop,
            COP_VALID_ABOVE,
            Some(&HEATPUMP.combined_alias("cop")),
        )
    }

    /// Power, heat and COP of each heat pump. With several heat pumps the
    /// combined power, heat and average COP follow the per-device columns.
    pub fn query_all(ids: &[u32]) -> Query {
        let quantities = [Quantity::Power, Quantity::Heat, Quantity::Cop];
        if ids.len() < 2 {
            return HEATPUMP.query_each(ids, &quantities);
        }
        HEATPUMP
            .proxy(ids, &quantities)
            .field(ProxyField::new(Self::ps_power(ids)))
            .field(ProxyField::new(Self::ps_heat(ids)))
            .field(ProxyField::new(Self::pa_cop(ids)))
            .into_query()
    }

    /// Combined electrical power.
    pub fn query_power_sum(ids: &[u32]) -> Query {
        HEATPUMP.query_sum(ids, Quantity::Power)
    }

    /// Combined heat output.
    pub fn query_heat_sum(ids: &[u32]) -> Query {
        HEATPUMP.query_sum(ids, Quantity::Heat)
    }

    /// Combined electrical energy over the selected window.
    pub fn query_denergy_sum(ids: &[u32]) -> Query {
        HEATPUMP.query_delta_sum(ids, Quantity::DEnergy)
    }

    /// Combined heat over the selected window.
    pub fn query_dheat_sum(ids: &[u32]) -> Query {
        HEATPUMP.query_delta_sum(ids, Quantity::DHeat)
    }
}
