//! Bidirectional grid meters: signed power, separate import/export counters.

use super::{Family, FieldDef, Quantity};
use crate::sql::Query;

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Power, "power_w"),
    FieldDef::new(Quantity::PowerIn, "GREATEST(power_w, 0)", "power_in_w"),
    FieldDef::new(Quantity::PowerOut, "GREATEST(-power_w, 0)", "power_out_w"),
    FieldDef::column(Quantity::EnergyIn, "energy_in_wh"),
    FieldDef::column(Quantity::EnergyOut, "energy_out_wh"),
    FieldDef::new(
        Quantity::DEnergyIn,
        "MAX(energy_in_wh) - MIN(energy_in_wh)",
        "d_energy_in_wh",
    ),
    FieldDef::new(
        Quantity::DEnergyOut,
        "MAX(energy_out_wh) - MIN(energy_out_wh)",
        "d_energy_out_wh",
    ),
];

pub static BIDIR_METER: Family = Family::new("bidir", "bidir_meter", CATALOG);

/// Query factories for bidirectional meters.
pub struct BidirMeter;

impl BidirMeter {
    /// Import and export power of each meter.
    pub fn query_power(ids: &[u32]) -> Query {
        BIDIR_METER.query_each(ids, &[Quantity::PowerIn, Quantity::PowerOut])
    }

    /// Combined signed power.
    pub fn query_power_sum(ids: &[u32]) -> Query {
        BIDIR_METER.query_sum(ids, Quantity::Power)
    }

    /// Imported energy over the selected window, all meters combined.
    pub fn query_denergy_in_sum(ids: &[u32]) -> Query {
        BIDIR_METER.query_delta_sum(ids, Quantity::DEnergyIn)
    }

    /// Exported energy over the selected window, all meters combined.
    pub fn query_denergy_out_sum(ids: &[u32]) -> Query {
        BIDIR_METER.query_delta_sum(ids, Quantity::DEnergyOut)
    }
}
