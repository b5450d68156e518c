//! Consumption: what the household draws, reconstructed from the grid meter.
//!
//! `meter (+) battery (-) generator (+) heatpump (-) solar (+) wallbox (-)`
//!
//! Grid import plus on-site production is what the house used; charging the
//! battery is not consumption. Heat pumps and wallboxes are metered loads
//! shown on their own, so they come off the household total.

use super::{Combination, Source};
use crate::config::Devices;
use crate::series::{Quantity, BATTERY, GENERATOR, HEATPUMP, METER, SOLAR, WALLBOX};
use crate::sql::Query;

pub struct Consumption;

impl Consumption {
    pub fn combine(devices: &Devices) -> Combination {
        let q = Quantity::Power;
        Combination::new("consumption")
            .source(Source::plus(&METER, &devices.meters, q))
            .source(Source::minus(&BATTERY, &devices.batteries, q))
            .source(Source::plus(&GENERATOR, &devices.generators, q))
            .source(Source::minus(&HEATPUMP, &devices.heatpumps, q))
            .source(Source::plus(&SOLAR, &devices.solars, q))
            .source(Source::minus(&WALLBOX, &devices.wallboxes, q))
    }

    /// Household power as `"consumption.power_w"`.
    pub fn query_power(devices: &Devices) -> Query {
        Self::combine(devices).query_sum("power_w")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::Render;

    #[test]
    fn test_sign_convention() {
        let devices = Devices {
            meters: vec![1],
            batteries: vec![1],
            generators: vec![2],
            heatpumps: vec![7],
            solars: vec![1],
            wallboxes: vec![3],
            ..Default::default()
        };
        assert_eq!(
            Consumption::combine(&devices).sum_field("power_w").render(),
            "COALESCE(meter1.power_w, 0) - COALESCE(battery1.power_w, 0) + \
             COALESCE(generator2.power_w, 0) - COALESCE(heatpump7.power_w, 0) + \
             COALESCE(solar1.power_w, 0) - COALESCE(wallbox3.power_w, 0) AS \"consumption.power_w\""
        );
    }

    #[test]
    fn test_anchor_is_meter() {
        let devices = Devices {
            meters: vec![1],
            solars: vec![1],
            ..Default::default()
        };
        let sql = Consumption::query_power(&devices).render();
        assert!(sql.contains("FROM meter1 FULL OUTER JOIN solar1 ON meter1.time = solar1.time OFFSET 0"));
    }

    #[test]
    fn test_without_meter_anchors_next_family() {
        let devices = Devices {
            batteries: vec![4],
            solars: vec![1],
            ..Default::default()
        };
        let sql = Consumption::query_power(&devices).render();
        assert!(sql.contains("-COALESCE(battery4.power_w, 0) + COALESCE(solar1.power_w, 0)"));
        assert!(sql.contains("FROM battery4 FULL OUTER JOIN solar1 ON battery4.time = solar1.time"));
    }
}
