//! Family catalogs and factories across every device family.

#[path = "../common/mod.rs"]
mod common;

use common::validate_sql;
use kilowatt::series::{
    Battery, BidirMeter, Boiler, Family, Generator, Heatpump, Meter, Quantity, SimpleMeter, Solar,
    Wallbox, Weather, BATTERY, BIDIR_METER, BOILER, GENERATOR, HEATPUMP, METER, SOLAR, WALLBOX,
    WEATHER,
};
use kilowatt::sql::{Query, Timeseries};

fn families() -> [&'static Family; 9] {
    [
        &SOLAR,
        &GENERATOR,
        &HEATPUMP,
        &BATTERY,
        &METER,
        &WALLBOX,
        &BIDIR_METER,
        &BOILER,
        &WEATHER,
    ]
}

// ============================================================================
// Single-id shortcut
// ============================================================================

#[test]
fn test_single_id_needs_no_join_machinery() {
    for family in families() {
        for def in family.catalog.iter().filter(|def| !def.quantity.is_delta()) {
            let sql = family.query_each(&[4], &[def.quantity]).render();
            assert!(
                sql.starts_with("SELECT time, "),
                "{} {:?}: {sql}",
                family.basename,
                def.quantity
            );
            assert!(sql.contains(&format!("FROM {} WHERE series_id = 4 AND", family.table)));
            assert!(!sql.contains("WITH"));
            assert!(!sql.contains("JOIN"));
            assert!(!sql.contains("proxy"));
        }
    }
}

#[test]
fn test_single_id_sum_uses_combined_alias() {
    let sql = Meter::query_power_sum(&[1]).render();
    assert_eq!(
        sql,
        "SELECT time, power_w AS \"meter.power_w\" FROM meter WHERE series_id = 1 AND $__timeFilter(time) ORDER BY time"
    );
}

// ============================================================================
// Multi-id sums
// ============================================================================

#[test]
fn test_multi_id_sums_coalesce_every_term() {
    let cases: [(&str, Query); 6] = [
        ("solar", Solar::query_power_sum(&[1, 2, 3])),
        ("generator", Generator::query_power_sum(&[1, 2, 3])),
        ("heatpump", Heatpump::query_power_sum(&[1, 2, 3])),
        ("battery", Battery::query_power_sum(&[1, 2, 3])),
        ("meter", Meter::query_power_sum(&[1, 2, 3])),
        ("wallbox", Wallbox::query_power_sum(&[1, 2, 3])),
    ];
    for (basename, query) in cases {
        let sql = query.render();
        let expected = format!(
            "COALESCE({b}1.power_w, 0) + COALESCE({b}2.power_w, 0) + COALESCE({b}3.power_w, 0) AS \"{b}.power_w\"",
            b = basename
        );
        assert!(sql.contains(&expected), "{sql}");
        validate_sql(&sql).unwrap();
    }
}

#[test]
fn test_heat_sum_uses_family_physics() {
    let sql = Generator::query_heat(&[1, 2]).render();
    assert!(sql.contains("generator1 AS (SELECT time, power_w * 6.93348 AS heat_w FROM generator"));
    assert!(sql.contains("COALESCE(generator1.heat_w, 0) + COALESCE(generator2.heat_w, 0) AS \"generator.heat_w\""));
    validate_sql(&sql).unwrap();

    let sql = Heatpump::query_heat_sum(&[1, 2]).render();
    assert!(sql.contains("heatpump1 AS (SELECT time, power_w * cop_pct / 100.0 AS heat_w FROM heatpump"));
}

// ============================================================================
// Window totals
// ============================================================================

#[test]
fn test_window_totals_are_unordered() {
    let queries = [
        Solar::query_denergy_sum(&[1]),
        Solar::query_denergy_sum(&[1, 8]),
        Generator::query_dheat_sum(&[2, 3]),
        Heatpump::query_denergy_sum(&[7]),
        Wallbox::query_denergy(&[3, 4]),
        BidirMeter::query_denergy_in_sum(&[5, 6]),
    ];
    for query in queries {
        let sql = query.render();
        assert!(!sql.contains("ORDER BY"), "{sql}");
        assert!(!sql.contains("proxy"), "{sql}");
        validate_sql(&sql).unwrap();
    }
}

#[test]
fn test_generator_dheat_single_id() {
    assert_eq!(
        Generator::query_dheat_sum(&[2]).render(),
        "SELECT (MAX(energy_wh) - MIN(energy_wh)) * 6.93348 AS \"generator.d_heat_wh\" FROM generator \
         WHERE series_id = 2 AND $__timeFilter(time)"
    );
}

#[test]
fn test_heatpump_dheat_reads_heat_counter() {
    let sql = Heatpump::query_dheat_sum(&[1, 2]).render();
    assert!(sql.contains("COALESCE(MAX(heatpump1.heat_wh),0)-COALESCE(MIN(heatpump1.heat_wh),0)+"));
}

// ============================================================================
// Series builder
// ============================================================================

#[test]
fn test_builder_call_order_is_column_order() {
    let a = HEATPUMP.series(1).time().power(None).cop(None).into_query().render();
    let b = HEATPUMP.series(1).time().cop(None).power(None).into_query().render();
    assert_eq!(a, "SELECT time, power_w, cop_pct / 100.0 AS cop FROM heatpump WHERE series_id = 1");
    assert_eq!(b, "SELECT time, cop_pct / 100.0 AS cop, power_w FROM heatpump WHERE series_id = 1");
}

#[test]
fn test_series_where_tokens() {
    let sql = BATTERY
        .series(2)
        .time()
        .charge(Some("c"))
        .time_filter()
        .where_token("AND")
        .time_not_null()
        .ordered()
        .into_query()
        .render();
    assert_eq!(
        sql,
        "SELECT time, charge_wh AS c FROM battery WHERE series_id = 2 AND $__timeFilter(time) \
         AND time IS NOT NULL ORDER BY time"
    );
}

#[test]
#[should_panic(expected = "family 'boiler' has no Power field")]
fn test_undeclared_quantity_panics() {
    let _ = BOILER.series(1).power(None);
}

#[test]
#[should_panic(expected = "DEnergy is a window-delta quantity")]
fn test_per_row_series_rejects_window_totals() {
    let _ = SOLAR.query_each(&[1], &[Quantity::DEnergy]);
}

#[test]
#[should_panic(expected = "query_sum: empty id list for family 'solar'")]
fn test_empty_ids_panic() {
    let _ = Solar::query_power_sum(&[]);
}

// ============================================================================
// Simple meters, weather
// ============================================================================

#[test]
fn test_simple_meter_on_custom_table() {
    static HEATER: Family = SimpleMeter::family("heater", "immersion_heater");
    let sql = SimpleMeter::query_power(&HEATER, &[1, 2]).render();
    assert!(sql.starts_with("WITH heater1 AS (SELECT time, power_w FROM immersion_heater WHERE series_id = 1"));
    assert!(sql.contains("heater2.power_w AS \"heater2.power_w\""));
}

#[test]
fn test_weather_channels_follow_label_positions() {
    let labels: Vec<String> = ["", "", "", "", "", "", "Cellar"].iter().map(|s| s.to_string()).collect();
    let sql = Weather::query_temps(&[1], &labels).render();
    assert_eq!(
        sql,
        "SELECT time, temp_c AS \"weather1.temp_c\", temp7_c AS \"weather1.Cellar\" FROM weather \
         WHERE series_id = 1 AND $__timeFilter(time) ORDER BY time"
    );
}

#[test]
fn test_weather_proxies_validate() {
    let labels = vec!["Garage".to_string(), "Attic".to_string()];
    for query in [
        Weather::query_temps(&[1, 2], &labels),
        Weather::query_rain(&[1, 2]),
        Weather::query_wind(&[1, 2]),
    ] {
        validate_sql(&query.render()).unwrap();
    }
}

#[test]
fn test_bidir_power_multi_id() {
    let sql = BidirMeter::query_power(&[5, 6]).render();
    assert!(sql.contains("bidir5 AS (SELECT time, GREATEST(power_w, 0) AS power_in_w, GREATEST(-power_w, 0) AS power_out_w FROM bidir_meter"));
    assert!(sql.contains("SELECT time, \"bidir5.power_in_w\", \"bidir5.power_out_w\", \"bidir6.power_in_w\", \"bidir6.power_out_w\" FROM ("));
    validate_sql(&sql).unwrap();
}

#[test]
fn test_catalog_lookup() {
    assert_eq!(SOLAR.def(Quantity::Power).expr, "power_w");
    assert_eq!(WEATHER.def(Quantity::Channel(3)).expr, "temp3_c");
    assert_eq!(HEATPUMP.column(7, Quantity::Cop), "heatpump7.cop");
    assert_eq!(Boiler::query_temps(&[1]).ctes.len(), 0);
}
