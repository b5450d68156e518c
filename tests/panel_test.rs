//! Panels assembled from a configuration file.

mod common;

use common::validate_sql;
use kilowatt::config::Settings;
use kilowatt::panel::{targets, Format, PanelKind, RawTarget};

const HOUSE: &str = r#"
[devices]
solars = [1, 8]
generators = [2]
heatpumps = [7, 9]
batteries = [1]
meters = [1]
wallboxes = [3]
weathers = [1, 2]
boilers = [1, 7]
bidir_meters = [5]
weather_labels = ["Garage", "", "Attic"]

[time_range]
from = "2024-03-01T00:00:00+01:00"
to = "2024-04-01T00:00:00+02:00"
"#;

fn house() -> Settings {
    let settings: Settings = toml::from_str(HOUSE).unwrap();
    settings.validate().unwrap();
    settings
}

#[test]
fn test_every_panel_is_valid_sql() {
    let settings = house();
    for kind in PanelKind::ALL {
        let targets = targets(kind, &settings.devices);
        assert!(!targets.is_empty(), "{kind}");
        for target in targets {
            validate_sql(&target.render()).unwrap_or_else(|e| panic!("{kind}/{}: {e}", target.ref_id));
        }
    }
}

#[test]
fn test_heat_panel() {
    let targets = targets(PanelKind::Heat, &house().devices);
    assert_eq!(targets.len(), 2);
    assert!(targets[0].render().contains("AS \"heating.heat_w\""));
    assert!(targets[0].render().contains("NULLIF("));
    assert_eq!(targets[1].ref_id, "B");
    assert!(targets[1].render().contains("\"boiler7.bot\""));
}

#[test]
fn test_energy_panel_tables() {
    let targets = targets(PanelKind::Energy, &house().devices);
    let aliases = [
        "\"production.d_energy_wh\"",
        "\"heating.d_heat_wh\"",
        "\"meter.d_energy_wh\"",
        "\"wallbox.d_energy_wh\"",
        "\"bidir.d_energy_in_wh\"",
        "\"bidir.d_energy_out_wh\"",
    ];
    assert_eq!(targets.len(), aliases.len());
    for (target, alias) in targets.iter().zip(aliases) {
        assert_eq!(target.format, Format::Table);
        assert!(target.render().contains(alias), "{}", target.render());
    }
}

#[test]
fn test_weather_panel_labels() {
    let targets = targets(PanelKind::Weather, &house().devices);
    let sql = targets[0].render();
    assert!(sql.contains("\"weather2.Garage\""));
    assert!(sql.contains("temp3_c AS \"weather1.Attic\""));
    assert!(!sql.contains("temp2_c"));
}

#[test]
fn test_json_targets_expand_time_range() {
    let settings = house();
    let range = settings.time_range().unwrap();
    let raw: Vec<RawTarget> = targets(PanelKind::Monthly, &settings.devices)
        .iter()
        .map(|t| t.to_raw(Some(&range)))
        .collect();

    let json = serde_json::to_value(&raw).unwrap();
    let first = &json[0];
    assert_eq!(first["refId"], "A");
    assert_eq!(first["format"], "time_series");
    let sql = first["rawSql"].as_str().unwrap();
    assert!(sql.contains("DATE_TRUNC('month', '2024-03-01T00:00:00+01:00'::timestamptz)"));
    assert!(!sql.contains("$__"));
}

#[test]
fn test_weather_aliases_are_distinct() {
    let targets = targets(PanelKind::Weather, &house().devices);
    let sql = targets[0].render();
    let outer = sql.split(" FROM (").next().unwrap();
    for alias in ["\"weather1.temp_c\"", "\"weather1.Garage\"", "\"weather2.Attic\""] {
        assert_eq!(outer.matches(alias).count(), 1, "{outer}");
    }
}

#[test]
fn test_colliding_weather_labels_rejected() {
    let config = HOUSE.replace(
        r#"weather_labels = ["Garage", "", "Attic"]"#,
        r#"weather_labels = ["Garage", "Garage", "temp_c"]"#,
    );
    let settings: Settings = toml::from_str(&config).unwrap();
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("used more than once"), "{err}");
}
