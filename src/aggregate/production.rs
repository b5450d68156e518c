//! Production: everything that generates electricity on site.
//!
//! `solar (+) generator (+)`

use super::{Combination, Source};
use crate::series::{Quantity, GENERATOR, SOLAR};
use crate::sql::Query;

pub struct Production;

impl Production {
    fn combine(solars: &[u32], generators: &[u32], quantity: Quantity) -> Combination {
        Combination::new("production")
            .source(Source::plus(&SOLAR, solars, quantity))
            .source(Source::plus(&GENERATOR, generators, quantity))
    }

    /// Combined production power as `"production.power_w"`.
    pub fn query_power(solars: &[u32], generators: &[u32]) -> Query {
        Self::combine(solars, generators, Quantity::Power).query_sum("power_w")
    }

    /// Energy produced over the selected window as `"production.d_energy_wh"`.
    pub fn query_denergy(solars: &[u32], generators: &[u32]) -> Query {
        Self::combine(solars, generators, Quantity::DEnergy).query_delta("d_energy_wh")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_solar_and_generator() {
        let sql = Production::query_power(&[1, 8], &[2]).render();
        assert_eq!(
            sql,
            "WITH solar1 AS (SELECT time, power_w FROM solar WHERE series_id = 1 AND $__timeFilter(time)), \
             solar8 AS (SELECT time, power_w FROM solar WHERE series_id = 8 AND $__timeFilter(time)), \
             generator2 AS (SELECT time, power_w FROM generator WHERE series_id = 2 AND $__timeFilter(time)) \
             SELECT time, \"production.power_w\" \
             FROM (SELECT COALESCE(solar1.time, solar8.time, generator2.time) AS time, \
             COALESCE(solar1.power_w, 0) + COALESCE(solar8.power_w, 0) + COALESCE(generator2.power_w, 0) \
             AS \"production.power_w\" FROM solar1 \
             FULL OUTER JOIN solar8 ON solar1.time = solar8.time \
             FULL OUTER JOIN generator2 ON solar1.time = generator2.time OFFSET 0) AS proxy \
             WHERE time IS NOT NULL ORDER BY time"
        );
    }

    #[test]
    fn test_power_generator_only_anchors_generator() {
        let sql = Production::query_power(&[], &[2, 3]).render();
        assert!(sql.contains("FROM generator2 FULL OUTER JOIN generator3 ON generator2.time = generator3.time"));
    }

    #[test]
    fn test_power_single_solar_is_direct() {
        assert_eq!(
            Production::query_power(&[1], &[]).render(),
            "SELECT time, power_w AS \"production.power_w\" FROM solar \
             WHERE series_id = 1 AND $__timeFilter(time) ORDER BY time"
        );
    }

    #[test]
    fn test_denergy() {
        let sql = Production::query_denergy(&[1], &[2]).render();
        assert!(sql.starts_with(
            "WITH solar1 AS (SELECT time, energy_wh FROM solar WHERE series_id = 1 AND $__timeFilter(time)), \
             generator2 AS (SELECT time, energy_wh FROM generator WHERE series_id = 2 AND $__timeFilter(time))"
        ));
        assert!(sql.ends_with(
            "SELECT COALESCE(MAX(solar1.energy_wh),0)-COALESCE(MIN(solar1.energy_wh),0)+\
             COALESCE(MAX(generator2.energy_wh),0)-COALESCE(MIN(generator2.energy_wh),0) \
             AS \"production.d_energy_wh\" FROM solar1 FULL OUTER JOIN generator2 ON solar1.time = generator2.time"
        ));
    }
}
