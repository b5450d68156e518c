//! Cross-family aggregation: anchors, signs and join chains.

#[path = "../common/mod.rs"]
mod common;

use common::validate_sql;
use kilowatt::aggregate::{Combination, Consumption, Heating, Production, Source};
use kilowatt::config::Devices;
use kilowatt::series::{Quantity, BATTERY, GENERATOR, HEATPUMP, METER, SOLAR, WALLBOX};

fn full_house() -> Devices {
    Devices {
        solars: vec![1, 8],
        generators: vec![2],
        heatpumps: vec![7, 9],
        batteries: vec![1],
        meters: vec![1],
        wallboxes: vec![3],
        ..Default::default()
    }
}

// ============================================================================
// Production
// ============================================================================

#[test]
fn test_production_single_generator_is_direct() {
    assert_eq!(
        Production::query_power(&[], &[2]).render(),
        "SELECT time, power_w AS \"production.power_w\" FROM generator \
         WHERE series_id = 2 AND $__timeFilter(time) ORDER BY time"
    );
}

#[test]
fn test_production_anchor_excluded_from_its_own_joins_only() {
    let sql = Production::query_power(&[1, 8], &[1]).render();
    assert!(sql.contains(
        "FROM solar1 FULL OUTER JOIN solar8 ON solar1.time = solar8.time \
         FULL OUTER JOIN generator1 ON solar1.time = generator1.time OFFSET 0"
    ));
    validate_sql(&sql).unwrap();
}

#[test]
fn test_production_denergy_single_solar() {
    assert_eq!(
        Production::query_denergy(&[1], &[]).render(),
        "SELECT MAX(energy_wh) - MIN(energy_wh) AS \"production.d_energy_wh\" FROM solar \
         WHERE series_id = 1 AND $__timeFilter(time)"
    );
}

// ============================================================================
// Consumption
// ============================================================================

#[test]
fn test_consumption_full_house() {
    let sql = Consumption::query_power(&full_house()).render();
    assert!(sql.contains(
        "COALESCE(meter1.power_w, 0) - COALESCE(battery1.power_w, 0) + COALESCE(generator2.power_w, 0) \
         - COALESCE(heatpump7.power_w, 0) - COALESCE(heatpump9.power_w, 0) \
         + COALESCE(solar1.power_w, 0) + COALESCE(solar8.power_w, 0) \
         - COALESCE(wallbox3.power_w, 0) AS \"consumption.power_w\""
    ));
    assert!(sql.contains(
        "SELECT COALESCE(meter1.time, battery1.time, generator2.time, heatpump7.time, heatpump9.time, \
         solar1.time, solar8.time, wallbox3.time) AS time"
    ));
    assert_eq!(sql.matches("FULL OUTER JOIN").count(), 7);
    validate_sql(&sql).unwrap();
}

#[test]
fn test_consumption_single_meter_is_direct() {
    let devices = Devices {
        meters: vec![1],
        ..Default::default()
    };
    assert_eq!(
        Consumption::query_power(&devices).render(),
        "SELECT time, power_w AS \"consumption.power_w\" FROM meter \
         WHERE series_id = 1 AND $__timeFilter(time) ORDER BY time"
    );
}

#[test]
fn test_consumption_only_loads_is_negative() {
    let devices = Devices {
        wallboxes: vec![3],
        ..Default::default()
    };
    let sql = Consumption::query_power(&devices).render();
    assert!(sql.contains("SELECT wallbox3.time AS time, -COALESCE(wallbox3.power_w, 0) AS \"consumption.power_w\" FROM wallbox3 OFFSET 0"));
    validate_sql(&sql).unwrap();
}

#[test]
#[should_panic(expected = "consumption: combination without any device")]
fn test_consumption_without_devices_panics() {
    let _ = Consumption::query_power(&Devices::default());
}

// ============================================================================
// Heating
// ============================================================================

#[test]
fn test_heating_with_two_heatpumps_and_generator() {
    let sql = Heating::query_heat(&[7, 9], &[2]).render();
    assert!(sql.starts_with(
        "WITH heatpump7 AS (SELECT time, power_w * cop_pct / 100.0 AS heat_w, cop_pct / 100.0 AS cop FROM heatpump"
    ));
    assert!(sql.contains("SELECT time, \"heating.heat_w\", \"heatpump.cop\" FROM ("));
    assert!(sql.contains(
        "COALESCE(heatpump7.heat_w, 0) + COALESCE(heatpump9.heat_w, 0) + COALESCE(generator2.heat_w, 0) AS \"heating.heat_w\""
    ));
    validate_sql(&sql).unwrap();
}

#[test]
fn test_heating_dheat_validates() {
    validate_sql(&Heating::query_dheat(&[7, 9], &[2]).render()).unwrap();
    validate_sql(&Heating::query_dheat(&[], &[2, 3]).render()).unwrap();
}

// ============================================================================
// Custom combinations
// ============================================================================

#[test]
fn test_custom_combination_delta() {
    let combo = Combination::new("self_use")
        .source(Source::plus(&SOLAR, &[1], Quantity::DEnergy))
        .source(Source::minus(&METER, &[1], Quantity::DEnergy))
        .source(Source::plus(&BATTERY, &[], Quantity::DEnergy));
    let sql = combo.query_delta("d_energy_wh").render();
    assert_eq!(
        sql,
        "WITH solar1 AS (SELECT time, energy_wh FROM solar WHERE series_id = 1 AND $__timeFilter(time)), \
         meter1 AS (SELECT time, energy_wh FROM meter WHERE series_id = 1 AND $__timeFilter(time)) \
         SELECT COALESCE(MAX(solar1.energy_wh),0)-COALESCE(MIN(solar1.energy_wh),0)\
         -COALESCE(MAX(meter1.energy_wh),0)+COALESCE(MIN(meter1.energy_wh),0) AS \"self_use.d_energy_wh\" \
         FROM solar1 FULL OUTER JOIN meter1 ON solar1.time = meter1.time"
    );
    validate_sql(&sql).unwrap();
}

#[test]
fn test_combination_relations_in_source_order() {
    let combo = Combination::new("x")
        .source(Source::plus(&HEATPUMP, &[7], Quantity::Power))
        .source(Source::plus(&GENERATOR, &[2, 3], Quantity::Power))
        .source(Source::minus(&WALLBOX, &[3], Quantity::Power));
    assert_eq!(combo.anchor(), "heatpump7");
    assert_eq!(
        combo.relations(),
        vec!["heatpump7", "generator2", "generator3", "wallbox3"]
    );
    assert_eq!(combo.joins().len(), 3);
}
