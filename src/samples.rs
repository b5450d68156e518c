//! Calendar buckets for day-over-day and month-over-month totals.
//!
//! A `samples` CTE generates one row per bucket over the host's selected
//! range, each instant shifted by a fixed offset (noon by default, clear of
//! midnight and daylight-saving edges). Cumulative counters are staged per
//! device at hour resolution and looked up at each bucket instant; with
//! `include_next` the following bucket's instant is looked up too and
//! `next - start` is the bucket's total.
//!
//! ```text
//! WITH samples AS (SELECT bucket + INTERVAL '12 hours' AS time, .. AS next_time
//!                  FROM GENERATE_SERIES(..) AS bucket),
//!      solar1 AS (SELECT DATE_TRUNC('hour', time) AS time, MAX(energy_wh) AS energy_wh ..)
//! SELECT samples.time AS time, solar1_next.energy_wh - solar1_start.energy_wh AS "solar1.d_energy_wh"
//! FROM samples
//! LEFT OUTER JOIN solar1 AS solar1_start ON solar1_start.time = samples.time
//! LEFT OUTER JOIN solar1 AS solar1_next ON solar1_next.time = samples.next_time
//! WHERE samples.time IS NOT NULL ORDER BY time
//! ```

use tracing::debug;

use crate::series::{coalesce_zero, Family, Quantity, TIME};
use crate::sql::{Dialect, Field, Join, Query, SqlDialect, Timeseries, TIME_FROM, TIME_TO};

/// Name of the bucket CTE.
pub const SAMPLES: &str = "samples";

/// Column of the bucket CTE holding the following bucket's instant.
pub const NEXT: &str = "next_time";

/// Calendar unit a bucket series is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncUnit {
    Day,
    Month,
}

impl TruncUnit {
    /// Field name understood by `DATE_TRUNC`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TruncUnit::Day => "day",
            TruncUnit::Month => "month",
        }
    }
}

/// `INTERVAL '<text>'`
fn interval(text: &str) -> String {
    format!("INTERVAL {}", Dialect::default().quote_string(text))
}

/// A calendar bucket generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Samples {
    pub unit: TruncUnit,
    /// Bucket length, e.g. `1 month`.
    pub interval: String,
    /// Shift of each bucket instant from the truncated boundary; empty for none.
    pub offset: String,
    /// Also emit the following bucket's instant as [`NEXT`].
    pub include_next: bool,
}

impl Samples {
    pub fn new(unit: TruncUnit, interval: &str, offset: &str, include_next: bool) -> Self {
        Self {
            unit,
            interval: interval.to_string(),
            offset: offset.to_string(),
            include_next,
        }
    }

    /// Day buckets sampled at noon, with the following noon.
    pub fn daily() -> Self {
        Self::new(TruncUnit::Day, "1 day", "12 hours", true)
    }

    /// Month buckets sampled at noon of the first, with the following first.
    pub fn monthly() -> Self {
        Self::new(TruncUnit::Month, "1 month", "12 hours", true)
    }

    fn shifted(&self, expr: &str) -> String {
        if self.offset.is_empty() {
            expr.to_string()
        } else {
            format!("{expr} + {}", interval(&self.offset))
        }
    }

    /// The bucket CTE: `time` and, with `include_next`, [`NEXT`].
    pub fn cte(&self) -> Query {
        let unit = Dialect::default().quote_string(self.unit.as_str());
        let step = interval(&self.interval);
        let series = format!(
            "GENERATE_SERIES(DATE_TRUNC({unit}, {TIME_FROM}::timestamptz), {TIME_TO}::timestamptz, {step}) AS bucket"
        );

        let mut query = Query::new()
            .name(SAMPLES)
            .field(Field::new(self.shifted("bucket"), Some(TIME)));
        if self.include_next {
            let next = self.shifted(&format!("bucket + {step}"));
            query = query.field(Field::new(next, Some(NEXT)));
        }
        query.from(series)
    }

    /// Hourly maximum of `quantity` for one device, restricted to the span
    /// the buckets look up.
    fn staged(&self, family: &'static Family, id: u32, quantity: Quantity) -> Query {
        let def = family.def(quantity);
        let edge = if self.include_next { NEXT } else { TIME };
        family
            .series(id)
            .with(Field::new("DATE_TRUNC('hour', time)", Some(TIME)))
            .with(Field::new(format!("MAX({})", def.expr), Some(def.alias)))
            .where_token("AND")
            .where_token(format!("time >= (SELECT MIN(time) FROM {SAMPLES})"))
            .where_token("AND")
            .where_token(format!(
                "time < (SELECT MAX({edge}) FROM {SAMPLES}) + {}",
                interval("1 hour")
            ))
            .where_token("GROUP BY 1")
            .into_query()
    }

    /// `<rel>_start` joined at each bucket instant, and `<rel>_next` at the
    /// following one when `include_next` is set.
    fn lookups(&self, family: &Family, id: u32) -> Vec<Join> {
        let relation = family.relation(id);
        let mut joins = vec![Join::left_outer(
            format!("{relation} AS {relation}_start"),
            format!("{relation}_start.time = {SAMPLES}.time"),
        )];
        if self.include_next {
            joins.push(Join::left_outer(
                format!("{relation} AS {relation}_next"),
                format!("{relation}_next.time = {SAMPLES}.{NEXT}"),
            ));
        }
        joins
    }

    fn query(&self, family: &'static Family, ids: &[u32], staged: Quantity, fields: Vec<Field>) -> Query {
        assert!(
            !ids.is_empty(),
            "samples: empty id list for family '{}'",
            family.basename
        );
        debug!(family = family.basename, ids = ?ids, unit = self.unit.as_str(), "bucket query");

        let ctes = std::iter::once(self.cte())
            .chain(ids.iter().map(|id| self.staged(family, *id, staged)))
            .collect();
        let fields = std::iter::once(Field::new(format!("{SAMPLES}.time"), Some(TIME)))
            .chain(fields)
            .collect();
        let joins = ids.iter().flat_map(|id| self.lookups(family, *id));
        Query::new()
            .subqueries(ctes)
            .fields(fields)
            .from(SAMPLES)
            .join_all(joins)
            .where_token(format!("{SAMPLES}.time IS NOT NULL"))
            .ordered()
    }

    fn counter(&self, delta: Quantity) -> Quantity {
        assert!(
            self.include_next,
            "bucket deltas need samples built with include_next"
        );
        match delta.counter() {
            Some(counter) => counter,
            None => panic!("{:?} is not a window-delta quantity", delta),
        }
    }

    /// `next - start` of the counter behind `delta`, `"<rel>.<delta alias>"`
    /// per device.
    ///
    /// # Panics
    ///
    /// Without `include_next`, or for a non-delta quantity.
    pub fn query_delta(&self, family: &'static Family, ids: &[u32], delta: Quantity) -> Query {
        let counter = self.counter(delta);
        let column = family.def(counter).alias;
        let label = family.def(delta).alias;
        let fields = ids
            .iter()
            .map(|id| {
                let rel = family.relation(*id);
                let expr = format!("{rel}_next.{column} - {rel}_start.{column}");
                Field::new(expr, Some(&family.per_id_alias(*id, label)))
            })
            .collect();
        self.query(family, ids, counter, fields)
    }

    /// Bucket deltas of all devices, null-safe summed as `"<basename>.<delta alias>"`.
    ///
    /// # Panics
    ///
    /// Without `include_next`, or for a non-delta quantity.
    pub fn query_delta_sum(&self, family: &'static Family, ids: &[u32], delta: Quantity) -> Query {
        let counter = self.counter(delta);
        let column = family.def(counter).alias;
        let expr = ids
            .iter()
            .map(|id| {
                let rel = family.relation(*id);
                coalesce_zero(&format!("{rel}_next.{column} - {rel}_start.{column}"))
            })
            .collect::<Vec<_>>()
            .join(" + ");
        let field = Field::new(expr, Some(&family.combined_alias(family.def(delta).alias)));
        self.query(family, ids, counter, vec![field])
    }

    /// Reading of `quantity` at each bucket instant, per device.
    ///
    /// # Panics
    ///
    /// For a window-delta quantity.
    pub fn query_snapshot(&self, family: &'static Family, ids: &[u32], quantity: Quantity) -> Query {
        quantity.expect_instant("samples snapshot");
        let def = family.def(quantity);
        let fields = ids
            .iter()
            .map(|id| {
                let expr = format!("{}_start.{}", family.relation(*id), def.alias);
                Field::new(expr, Some(&family.per_id_alias(*id, def.alias)))
            })
            .collect();
        self.query(family, ids, quantity, fields)
    }
}

impl Default for Samples {
    fn default() -> Self {
        Self::monthly()
    }
}
