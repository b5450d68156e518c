//! Dashboard panels: the query lists handed to the host.
//!
//! A panel is a list of independent [`Target`]s, each one SQL statement plus
//! the refId the host uses to match results to visual fields. Families with
//! no configured device contribute nothing.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::aggregate::{Consumption, Heating, Production};
use crate::config::Devices;
use crate::samples::Samples;
use crate::series::{
    Battery, BidirMeter, Boiler, Generator, Heatpump, Meter, Quantity, Solar, Wallbox, Weather,
    GENERATOR, HEATPUMP, METER, SOLAR, WALLBOX,
};
use crate::sql::{expand, Query, TimeRange};

/// How the host should read a target's result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    TimeSeries,
    Table,
}

/// One query of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub ref_id: String,
    pub query: Query,
    pub format: Format,
}

/// Wire shape of a target for a SQL datasource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTarget {
    pub ref_id: String,
    pub raw_sql: String,
    pub format: Format,
}

impl Target {
    pub fn render(&self) -> String {
        self.query.render()
    }

    /// Rendered with host placeholders resolved against `range`.
    pub fn render_expanded(&self, range: &TimeRange) -> String {
        expand(&self.render(), range)
    }

    pub fn to_raw(&self, range: Option<&TimeRange>) -> RawTarget {
        let raw_sql = match range {
            Some(range) => self.render_expanded(range),
            None => self.render(),
        };
        RawTarget {
            ref_id: self.ref_id.clone(),
            raw_sql,
            format: self.format,
        }
    }
}

/// `A`, `B`, .., `Z`, `AA`, `AB`, ..
pub fn ref_id(index: usize) -> String {
    let mut n = index + 1;
    let mut id = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        id.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    id.reverse();
    String::from_utf8_lossy(&id).into_owned()
}

/// Error type for panel lookup.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Unknown panel '{0}', expected one of: {list}", list = PanelKind::names().join(", "))]
    UnknownPanel(String),
}

/// Every panel the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Power,
    Heat,
    Energy,
    Battery,
    Boiler,
    Weather,
    Solar,
    Generator,
    Heatpump,
    Grid,
    Wallbox,
    Monthly,
    Daily,
}

impl PanelKind {
    pub const ALL: [PanelKind; 13] = [
        PanelKind::Power,
        PanelKind::Heat,
        PanelKind::Energy,
        PanelKind::Battery,
        PanelKind::Boiler,
        PanelKind::Weather,
        PanelKind::Solar,
        PanelKind::Generator,
        PanelKind::Heatpump,
        PanelKind::Grid,
        PanelKind::Wallbox,
        PanelKind::Monthly,
        PanelKind::Daily,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PanelKind::Power => "power",
            PanelKind::Heat => "heat",
            PanelKind::Energy => "energy",
            PanelKind::Battery => "battery",
            PanelKind::Boiler => "boiler",
            PanelKind::Weather => "weather",
            PanelKind::Solar => "solar",
            PanelKind::Generator => "generator",
            PanelKind::Heatpump => "heatpump",
            PanelKind::Grid => "grid",
            PanelKind::Wallbox => "wallbox",
            PanelKind::Monthly => "monthly",
            PanelKind::Daily => "daily",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PanelKind::Power => "production, consumption and load power",
            PanelKind::Heat => "heating power with heat pump COP, boiler temperatures",
            PanelKind::Energy => "energy and heat totals over the selected range",
            PanelKind::Battery => "battery charge, level and power",
            PanelKind::Boiler => "boiler temperatures",
            PanelKind::Weather => "weather station channels",
            PanelKind::Solar => "solar power and yield",
            PanelKind::Generator => "generator power, heat and totals",
            PanelKind::Heatpump => "heat pump power, heat and COP",
            PanelKind::Grid => "grid meter power",
            PanelKind::Wallbox => "wallbox power and energy",
            PanelKind::Monthly => "month-over-month energy and heat",
            PanelKind::Daily => "day-over-day energy and heat",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(PanelKind::name).collect()
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelKind {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| PanelError::UnknownPanel(s.to_string()))
    }
}

/// Collects queries in order, skipping families without devices.
#[derive(Default)]
struct Targets {
    queries: Vec<(Query, Format)>,
}

impl Targets {
    fn push_if(&mut self, present: bool, format: Format, query: impl FnOnce() -> Query) -> &mut Self {
        if present {
            self.queries.push((query(), format));
        }
        self
    }

    fn series(&mut self, ids: &[u32], query: impl FnOnce(&[u32]) -> Query) -> &mut Self {
        self.push_if(!ids.is_empty(), Format::TimeSeries, || query(ids))
    }

    fn table(&mut self, ids: &[u32], query: impl FnOnce(&[u32]) -> Query) -> &mut Self {
        self.push_if(!ids.is_empty(), Format::Table, || query(ids))
    }

    fn finish(self) -> Vec<Target> {
        self.queries
            .into_iter()
            .enumerate()
            .map(|(i, (query, format))| Target {
                ref_id: ref_id(i),
                query,
                format,
            })
            .collect()
    }
}

fn buckets(samples: Samples, d: &Devices) -> Targets {
    let mut t = Targets::default();
    t.series(&d.solars, |ids| samples.query_delta_sum(&SOLAR, ids, Quantity::DEnergy))
        .series(&d.generators, |ids| samples.query_delta_sum(&GENERATOR, ids, Quantity::DEnergy))
        .series(&d.meters, |ids| samples.query_delta_sum(&METER, ids, Quantity::DEnergy))
        .series(&d.wallboxes, |ids| samples.query_delta_sum(&WALLBOX, ids, Quantity::DEnergy))
        .series(&d.heatpumps, |ids| samples.query_delta_sum(&HEATPUMP, ids, Quantity::DHeat));
    t
}

/// The target list of `kind` for the configured devices.
pub fn targets(kind: PanelKind, d: &Devices) -> Vec<Target> {
    let producers = !d.solars.is_empty() || !d.generators.is_empty();
    let heaters = !d.heatpumps.is_empty() || !d.generators.is_empty();

    let mut t = Targets::default();
    match kind {
        PanelKind::Power => {
            let consumption = Consumption::combine(d);
            t.push_if(producers, Format::TimeSeries, || {
                Production::query_power(&d.solars, &d.generators)
            })
            .push_if(!consumption.is_empty(), Format::TimeSeries, || {
                consumption.query_sum("power_w")
            })
            .series(&d.heatpumps, Heatpump::query_power_sum)
            .series(&d.wallboxes, Wallbox::query_power_sum)
            .series(&d.batteries, Battery::query_power_sum)
            .series(&d.bidir_meters, BidirMeter::query_power);
        }
        PanelKind::Heat => {
            t.push_if(heaters, Format::TimeSeries, || {
                Heating::query_heat(&d.heatpumps, &d.generators)
            })
            .series(&d.boilers, Boiler::query_temps);
        }
        PanelKind::Energy => {
            t.push_if(producers, Format::Table, || {
                Production::query_denergy(&d.solars, &d.generators)
            })
            .push_if(heaters, Format::Table, || {
                Heating::query_dheat(&d.heatpumps, &d.generators)
            })
            .table(&d.meters, Meter::query_denergy_sum)
            .table(&d.wallboxes, Wallbox::query_denergy_sum)
            .table(&d.bidir_meters, BidirMeter::query_denergy_in_sum)
            .table(&d.bidir_meters, BidirMeter::query_denergy_out_sum);
        }
        PanelKind::Battery => {
            t.series(&d.batteries, Battery::query_charge)
                .series(&d.batteries, Battery::query_level)
                .series(&d.batteries, Battery::query_power);
        }
        PanelKind::Boiler => {
            t.series(&d.boilers, Boiler::query_temps);
        }
        PanelKind::Weather => {
            t.series(&d.weathers, |ids| Weather::query_temps(ids, &d.weather_labels))
                .series(&d.weathers, Weather::query_humidity)
                .series(&d.weathers, Weather::query_rain)
                .series(&d.weathers, Weather::query_wind);
        }
        PanelKind::Solar => {
            t.series(&d.solars, Solar::query_power)
                .series(&d.solars, Solar::query_power_sum)
                .table(&d.solars, Solar::query_denergy)
                .table(&d.solars, Solar::query_denergy_sum);
        }
        PanelKind::Generator => {
            t.series(&d.generators, Generator::query_power)
                .series(&d.generators, Generator::query_power_sum)
                .series(&d.generators, Generator::query_heat)
                .table(&d.generators, Generator::query_denergy_sum)
                .table(&d.generators, Generator::query_dheat_sum);
        }
        PanelKind::Heatpump => {
            t.series(&d.heatpumps, Heatpump::query_all)
                .series(&d.heatpumps, Heatpump::query_heat_sum)
                .table(&d.heatpumps, Heatpump::query_denergy_sum)
                .table(&d.heatpumps, Heatpump::query_dheat_sum);
        }
        PanelKind::Grid => {
            t.series(&d.meters, Meter::query_power)
                .series(&d.meters, Meter::query_power_sum)
                .series(&d.bidir_meters, BidirMeter::query_power_sum);
        }
        PanelKind::Wallbox => {
            t.series(&d.wallboxes, Wallbox::query_power)
                .table(&d.wallboxes, Wallbox::query_denergy);
        }
        PanelKind::Monthly => t = buckets(Samples::monthly(), d),
        PanelKind::Daily => t = buckets(Samples::daily(), d),
    }

    let targets = t.finish();
    debug!(panel = %kind, targets = targets.len(), "panel assembled");
    targets
}
