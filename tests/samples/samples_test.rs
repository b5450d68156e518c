//! Calendar bucket queries.

#[path = "../common/mod.rs"]
mod common;

use common::validate_sql;
use kilowatt::samples::{Samples, TruncUnit};
use kilowatt::series::{Quantity, HEATPUMP, METER, SOLAR, WALLBOX};

#[test]
fn test_monthly_solar_two_ids() {
    let sql = Samples::monthly()
        .query_delta(&SOLAR, &[1, 8], Quantity::DEnergy)
        .render();
    assert!(sql.starts_with(
        "WITH samples AS (SELECT bucket + INTERVAL '12 hours' AS time, \
         bucket + INTERVAL '1 month' + INTERVAL '12 hours' AS next_time \
         FROM GENERATE_SERIES(DATE_TRUNC('month', $__timeFrom()::timestamptz), $__timeTo()::timestamptz, \
         INTERVAL '1 month') AS bucket), solar1 AS (SELECT DATE_TRUNC('hour', time) AS time"
    ));
    assert!(sql.contains(
        "SELECT samples.time AS time, \
         solar1_next.energy_wh - solar1_start.energy_wh AS \"solar1.d_energy_wh\", \
         solar8_next.energy_wh - solar8_start.energy_wh AS \"solar8.d_energy_wh\" FROM samples"
    ));
    assert_eq!(sql.matches("LEFT OUTER JOIN").count(), 4);
    assert!(sql.ends_with("WHERE samples.time IS NOT NULL ORDER BY time"));
    validate_sql(&sql).unwrap();
}

#[test]
fn test_heatpump_heat_counter() {
    let sql = Samples::daily()
        .query_delta_sum(&HEATPUMP, &[7], Quantity::DHeat)
        .render();
    assert!(sql.contains("heatpump7 AS (SELECT DATE_TRUNC('hour', time) AS time, MAX(heat_wh) AS heat_wh FROM heatpump"));
    assert!(sql.contains("COALESCE(heatpump7_next.heat_wh - heatpump7_start.heat_wh, 0) AS \"heatpump.d_heat_wh\""));
    validate_sql(&sql).unwrap();
}

#[test]
fn test_custom_offset_and_interval() {
    let samples = Samples::new(TruncUnit::Day, "7 days", "6 hours", true);
    let sql = samples.query_delta_sum(&WALLBOX, &[3], Quantity::DEnergy).render();
    assert!(sql.contains("SELECT bucket + INTERVAL '6 hours' AS time, bucket + INTERVAL '7 days' + INTERVAL '6 hours' AS next_time"));
    assert!(sql.contains("DATE_TRUNC('day', $__timeFrom()::timestamptz)"));
    validate_sql(&sql).unwrap();
}

#[test]
fn test_default_is_monthly() {
    assert_eq!(Samples::default(), Samples::monthly());
}

#[test]
fn test_snapshot_readings() {
    let samples = Samples::new(TruncUnit::Month, "1 month", "", false);
    let sql = samples.query_snapshot(&METER, &[1, 2], Quantity::Energy).render();
    assert!(sql.starts_with("WITH samples AS (SELECT bucket AS time FROM GENERATE_SERIES("));
    assert!(sql.contains("meter2_start.energy_wh AS \"meter2.energy_wh\""));
    assert_eq!(sql.matches("LEFT OUTER JOIN").count(), 2);
    validate_sql(&sql).unwrap();
}

#[test]
#[should_panic(expected = "not a window-delta quantity")]
fn test_non_delta_quantity_panics() {
    let _ = Samples::monthly().query_delta(&METER, &[1], Quantity::Power);
}
