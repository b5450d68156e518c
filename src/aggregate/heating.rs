//! Heating: heat delivered by heat pumps and generators.
//!
//! `heatpump (+) generator (+)`, heat pumps anchoring the join whenever any
//! are configured. The heat series carries the heat pump COP alongside.

use super::{Combination, Source};
use crate::proxy::ProxyField;
use crate::series::{Heatpump, Quantity, GENERATOR, HEATPUMP};
use crate::sql::{Query, Timeseries};

pub struct Heating;

impl Heating {
    fn combine(heatpumps: Source, generators: &[u32], quantity: Quantity) -> Combination {
        Combination::new("heating")
            .source(heatpumps)
            .source(Source::plus(&GENERATOR, generators, quantity))
    }

    /// Combined heat as `"heating.heat_w"` plus `"heatpump.cop"` when heat
    /// pumps are configured: the COP itself for one heat pump, the average
    /// over running heat pumps for several.
    pub fn query_heat(heatpumps: &[u32], generators: &[u32]) -> Query {
        let staged = Source::plus(&HEATPUMP, heatpumps, Quantity::Heat).also(Quantity::Cop);
        let combo = Self::combine(staged, generators, Quantity::Heat);
        match (heatpumps, generators) {
            ([], _) => combo.query_sum("heat_w"),
            ([id], []) => HEATPUMP
                .series(*id)
                .time()
                .heat(Some(&combo.alias("heat_w")))
                .cop(Some(&HEATPUMP.combined_alias("cop")))
                .time_filter()
                .ordered()
                .into_query(),
            _ => combo
                .proxy()
                .field(ProxyField::new(combo.sum_field("heat_w")))
                .field(ProxyField::new(Heatpump::pa_cop(heatpumps)))
                .into_query(),
        }
    }

    /// Heat delivered over the selected window as `"heating.d_heat_wh"`.
    pub fn query_dheat(heatpumps: &[u32], generators: &[u32]) -> Query {
        let staged = Source::plus(&HEATPUMP, heatpumps, Quantity::DHeat);
        Self::combine(staged, generators, Quantity::DHeat).query_delta("d_heat_wh")
    }
}
