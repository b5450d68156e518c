//! Per-device series and the field catalogs of each device family.
//!
//! A [`Family`] is a constant table: the physical table name, the relation
//! basename (`solar` → `solar1`, `solar8`, …) and one [`FieldDef`] per
//! measurable [`Quantity`]. A [`Series`] is one device id of a family, staged
//! as a query against the family table; builder calls append fields in call
//! order, which is the SELECT order of the output.
//!
//! Multi-id helpers follow one naming scheme:
//!
//! - `ps` (proxy-sum): `COALESCE(a.col, 0) + COALESCE(b.col, 0) + …`, or the
//!   single column itself when only one id is given
//! - `pa` (proxy-average): a `ps` sum divided by the number of sources whose
//!   value is valid, `NULLIF`-guarded so a row without valid sources is NULL
//! - `pd` (proxy-delta): window totals of cumulative counters,
//!   `COALESCE(MAX(a.col),0)-COALESCE(MIN(a.col),0)+…`
//!
//! Handing any of them an empty id list is a composition bug and panics.

pub mod battery;
pub mod bidir_meter;
pub mod boiler;
pub mod generator;
pub mod heatpump;
pub mod meter;
pub mod solar;
pub mod weather;

pub use battery::{Battery, BATTERY};
pub use bidir_meter::{BidirMeter, BIDIR_METER};
pub use boiler::{Boiler, BOILER};
pub use generator::{Generator, GENERATOR, HEAT_FACTOR};
pub use heatpump::{Heatpump, HEATPUMP};
pub use meter::{Meter, SimpleMeter, Wallbox, METER, WALLBOX};
pub use solar::{Solar, SOLAR};
pub use weather::{check_labels, LabelError, Weather, WEATHER};

use tracing::debug;

use crate::proxy::{AggregateProxy, ProxyQuery, TimeseriesProxy};
use crate::sql::{quote_alias, time_join, Field, Fragment, Join, Query, Timeseries};

/// Column every physical table is indexed by.
pub const TIME: &str = "time";

// =============================================================================
// Quantities and field definitions
// =============================================================================

/// A measurable quantity a family may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Instantaneous power (W).
    Power,
    /// Cumulative energy counter (Wh).
    Energy,
    /// Instantaneous heat output (W).
    Heat,
    /// Cumulative heat counter (Wh).
    HeatEnergy,
    /// Coefficient of performance.
    Cop,
    /// Energy over the selected window.
    DEnergy,
    /// Heat over the selected window.
    DHeat,
    /// Stored charge (Wh).
    Charge,
    /// Stored charge relative to capacity (%).
    Level,
    PowerIn,
    PowerOut,
    EnergyIn,
    EnergyOut,
    DEnergyIn,
    DEnergyOut,
    /// Boiler temperature, top sensor.
    Top,
    /// Boiler temperature, middle sensor.
    Mid,
    /// Boiler temperature, bottom sensor.
    Bot,
    Temperature,
    Humidity,
    Rain,
    Wind,
    /// Auxiliary weather temperature channel, 1 to 7.
    Channel(u8),
}

impl Quantity {
    /// The cumulative counter a window-delta quantity is derived from.
    pub fn counter(&self) -> Option<Quantity> {
        match self {
            Quantity::DEnergy => Some(Quantity::Energy),
            Quantity::DHeat => Some(Quantity::HeatEnergy),
            Quantity::DEnergyIn => Some(Quantity::EnergyIn),
            Quantity::DEnergyOut => Some(Quantity::EnergyOut),
            _ => None,
        }
    }

    pub fn is_delta(&self) -> bool {
        self.counter().is_some()
    }

    /// Window-delta quantities aggregate over the whole window and cannot
    /// sit next to `time` in a per-row series.
    ///
    /// # Panics
    ///
    /// When `self` is a window-delta quantity.
    pub(crate) fn expect_instant(&self, helper: &str) {
        assert!(
            !self.is_delta(),
            "{}: {:?} is a window-delta quantity, use the delta factories",
            helper,
            self
        );
    }
}

/// Canonical definition of one quantity: source expression and default alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub quantity: Quantity,
    pub expr: &'static str,
    pub alias: &'static str,
}

impl FieldDef {
    pub const fn new(quantity: Quantity, expr: &'static str, alias: &'static str) -> Self {
        Self {
            quantity,
            expr,
            alias,
        }
    }

    /// A self-aliased physical column.
    pub const fn column(quantity: Quantity, column: &'static str) -> Self {
        Self::new(quantity, column, column)
    }

    /// The canonical field: `expr AS alias`, bare when they coincide.
    pub fn field(&self) -> Field {
        Field::new(self.expr, Some(self.alias))
    }
}

// =============================================================================
// Family
// =============================================================================

/// Static metadata of one device family.
#[derive(Debug)]
pub struct Family {
    /// Relation prefix; `<basename><id>` names a staged series.
    pub basename: &'static str,
    /// Physical table holding every device of the family.
    pub table: &'static str,
    pub catalog: &'static [FieldDef],
}

impl Family {
    pub const fn new(basename: &'static str, table: &'static str, catalog: &'static [FieldDef]) -> Self {
        Self {
            basename,
            table,
            catalog,
        }
    }

    /// Relation name of one device, e.g. `heatpump7`.
    pub fn relation(&self, id: u32) -> String {
        format!("{}{}", self.basename, id)
    }

    pub fn relations(&self, ids: &[u32]) -> Vec<String> {
        ids.iter().map(|id| self.relation(*id)).collect()
    }

    /// Catalog entry for `quantity`.
    ///
    /// # Panics
    ///
    /// When the family does not declare the quantity.
    pub fn def(&self, quantity: Quantity) -> &'static FieldDef {
        match self.catalog.iter().find(|def| def.quantity == quantity) {
            Some(def) => def,
            None => panic!("family '{}' has no {:?} field", self.basename, quantity),
        }
    }

    pub fn field(&self, quantity: Quantity) -> Field {
        self.def(quantity).field()
    }

    /// Column of a staged series, e.g. `heatpump7.heat_w`.
    pub fn column(&self, id: u32, quantity: Quantity) -> String {
        format!("{}.{}", self.relation(id), self.def(quantity).alias)
    }

    /// Quoted per-device alias, e.g. `"boiler1.top"`.
    pub fn per_id_alias(&self, id: u32, label: &str) -> String {
        quote_alias(&format!("{}.{}", self.relation(id), label))
    }

    /// Quoted family-wide alias, e.g. `"solar.power_w"`.
    pub fn combined_alias(&self, label: &str) -> String {
        quote_alias(&format!("{}.{}", self.basename, label))
    }

    /// Start a series for one device of this family.
    pub fn series(&'static self, id: u32) -> Series {
        Series::new(self, id)
    }

    /// Full-outer time joins from `anchor` to each of `ids`.
    pub fn time_join(&self, anchor: &str, ids: &[u32]) -> Vec<Join> {
        time_join(anchor, self.basename, ids)
    }

    /// One time-filtered CTE per id, carrying `time` and `quantities`.
    pub fn ctes(&'static self, ids: &[u32], quantities: &[Quantity]) -> Vec<Query> {
        ids.iter()
            .map(|id| {
                quantities
                    .iter()
                    .fold(self.series(*id).time(), |series, q| series.field(*q, None))
                    .time_filter()
                    .into_query()
            })
            .collect()
    }

    fn expect_ids(&self, ids: &[u32], helper: &str) {
        assert!(
            !ids.is_empty(),
            "{}: empty id list for family '{}'",
            helper,
            self.basename
        );
    }

    /// Per-device proxy over `quantities`; callers append combined fields.
    pub fn proxy(&'static self, ids: &[u32], quantities: &[Quantity]) -> ProxyQuery {
        quantities
            .iter()
            .fold(TimeseriesProxy::new(self, ids), |proxy, q| proxy.quantity(*q))
            .into_proxy()
    }

    /// Proxy-sum of `quantity` over staged series.
    pub fn ps(&self, ids: &[u32], quantity: Quantity, alias: Option<&str>) -> Field {
        self.expect_ids(ids, "ps");
        if let [id] = ids {
            return Field::new(self.column(*id, quantity), alias);
        }
        let expr = ids
            .iter()
            .map(|id| coalesce_zero(&self.column(*id, quantity)))
            .collect::<Vec<_>>()
            .join(" + ");
        Field::new(expr, alias)
    }

    /// Proxy-average of `quantity` over the sources whose value exceeds
    /// `valid_above`. A row with no valid source evaluates to NULL.
    pub fn pa(&self, ids: &[u32], quantity: Quantity, valid_above: &str, alias: Option<&str>) -> Field {
        self.expect_ids(ids, "pa");
        if let [id] = ids {
            return Field::new(self.column(*id, quantity), alias);
        }
        let sum = self.ps(ids, quantity, None).expr;
        let valid = ids
            .iter()
            .map(|id| {
                format!(
                    "CASE WHEN {} > {} THEN 1 ELSE 0 END",
                    self.column(*id, quantity),
                    valid_above
                )
            })
            .collect::<Vec<_>>()
            .join(" + ");
        Field::new(format!("({sum}) / NULLIF({valid}, 0)"), alias)
    }

    /// Proxy-delta: window total of the cumulative `counter` over staged series.
    pub fn pd(&self, ids: &[u32], counter: Quantity, alias: Option<&str>) -> Field {
        self.expect_ids(ids, "pd");
        if let [id] = ids {
            let column = self.column(*id, counter);
            return Field::new(format!("MAX({column}) - MIN({column})"), alias);
        }
        let expr = ids
            .iter()
            .map(|id| delta_terms(&self.column(*id, counter)))
            .collect::<Vec<_>>()
            .join("+");
        Field::new(expr, alias)
    }

    // =========================================================================
    // Query factories
    // =========================================================================

    /// Each quantity of each device as its own output column.
    pub fn query_each(&'static self, ids: &[u32], quantities: &[Quantity]) -> Query {
        let channels: Vec<(Quantity, Option<String>)> =
            quantities.iter().map(|q| (*q, None)).collect();
        self.query_labelled(ids, &channels)
    }

    /// Like [`Family::query_each`], with an optional output label per quantity.
    pub fn query_labelled(&'static self, ids: &[u32], channels: &[(Quantity, Option<String>)]) -> Query {
        self.expect_ids(ids, "query_labelled");
        for (q, _) in channels {
            q.expect_instant("query_labelled");
        }
        if let [id] = ids {
            debug!(family = self.basename, id, "single-id series query");
            let series = channels.iter().fold(self.series(*id).time(), |series, (q, label)| {
                let label = label.as_deref().unwrap_or(self.def(*q).alias);
                let alias = self.per_id_alias(*id, label);
                series.field(*q, Some(&alias))
            });
            return series.time_filter().ordered().into_query();
        }

        debug!(family = self.basename, ids = ?ids, "per-id proxy query");
        channels
            .iter()
            .fold(TimeseriesProxy::new(self, ids), |proxy, (q, label)| match label {
                Some(label) => proxy.labelled(*q, label),
                None => proxy.quantity(*q),
            })
            .into_query()
    }

    /// One combined, null-safe sum of `quantity` across all devices.
    pub fn query_sum(&'static self, ids: &[u32], quantity: Quantity) -> Query {
        self.expect_ids(ids, "query_sum");
        quantity.expect_instant("query_sum");
        let alias = self.combined_alias(self.def(quantity).alias);
        if let [id] = ids {
            debug!(family = self.basename, id, "single-id sum query");
            return self
                .series(*id)
                .time()
                .field(quantity, Some(&alias))
                .time_filter()
                .ordered()
                .into_query();
        }

        debug!(family = self.basename, ids = ?ids, "aggregate proxy query");
        AggregateProxy::new(self, ids).sum(quantity).into_query()
    }

    /// Window total of a delta quantity for each device.
    pub fn query_delta(&'static self, ids: &[u32], delta: Quantity) -> Query {
        self.expect_ids(ids, "query_delta");
        let def = self.def(delta);
        if let [id] = ids {
            let alias = self.per_id_alias(*id, def.alias);
            return self.series(*id).field(delta, Some(&alias)).time_filter().into_query();
        }

        let counter = delta_counter(delta);
        let fields = ids
            .iter()
            .map(|id| self.pd(&[*id], counter, Some(&self.per_id_alias(*id, def.alias))))
            .collect();
        self.joined(ids, counter).fields(fields)
    }

    /// Window total of a delta quantity summed across devices.
    pub fn query_delta_sum(&'static self, ids: &[u32], delta: Quantity) -> Query {
        self.expect_ids(ids, "query_delta_sum");
        let alias = self.combined_alias(self.def(delta).alias);
        if let [id] = ids {
            return self.series(*id).field(delta, Some(&alias)).time_filter().into_query();
        }

        let counter = delta_counter(delta);
        let field = self.pd(ids, counter, Some(&alias));
        self.joined(ids, counter).field(field)
    }

    /// Staged `counter` series for every id, full-outer joined on time.
    fn joined(&'static self, ids: &[u32], counter: Quantity) -> Query {
        let anchor = self.relation(ids[0]);
        Query::new()
            .subqueries(self.ctes(ids, &[counter]))
            .from(anchor.as_str())
            .joins(self.time_join(&anchor, &ids[1..]))
    }
}

fn delta_counter(delta: Quantity) -> Quantity {
    match delta.counter() {
        Some(counter) => counter,
        None => panic!("{:?} is not a window-delta quantity", delta),
    }
}

/// `COALESCE(<column>, 0)`
pub fn coalesce_zero(column: &str) -> String {
    format!("COALESCE({column}, 0)")
}

/// `COALESCE(MAX(<column>),0)-COALESCE(MIN(<column>),0)`
pub fn delta_terms(column: &str) -> String {
    format!("COALESCE(MAX({column}),0)-COALESCE(MIN({column}),0)")
}

// =============================================================================
// Series
// =============================================================================

/// One device of one family, staged as a query against the family table.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct Series {
    family: &'static Family,
    query: Query,
}

impl Series {
    pub fn new(family: &'static Family, id: u32) -> Self {
        let query = Query::new()
            .name(family.relation(id))
            .from(Fragment::new(family.table))
            .where_token(format!("series_id = {id}"));
        Self { family, query }
    }

    pub fn time(mut self) -> Self {
        self.query = self.query.field(Field::bare(TIME));
        self
    }

    /// Append the canonical field of `quantity`, optionally renamed.
    pub fn field(mut self, quantity: Quantity, alias: Option<&str>) -> Self {
        let field = self.family.field(quantity).with_alias(alias);
        self.query = self.query.field(field);
        self
    }

    /// Append an arbitrary field.
    pub fn with(mut self, field: Field) -> Self {
        self.query = self.query.field(field);
        self
    }

    pub fn where_token(mut self, token: impl Into<String>) -> Self {
        self.query = self.query.where_token(token);
        self
    }

    pub fn power(self, alias: Option<&str>) -> Self {
        self.field(Quantity::Power, alias)
    }

    pub fn energy(self, alias: Option<&str>) -> Self {
        self.field(Quantity::Energy, alias)
    }

    pub fn heat(self, alias: Option<&str>) -> Self {
        self.field(Quantity::Heat, alias)
    }

    pub fn cop(self, alias: Option<&str>) -> Self {
        self.field(Quantity::Cop, alias)
    }

    pub fn charge(self, alias: Option<&str>) -> Self {
        self.field(Quantity::Charge, alias)
    }

    pub fn d_energy(self, alias: Option<&str>) -> Self {
        self.field(Quantity::DEnergy, alias)
    }

    pub fn d_heat(self, alias: Option<&str>) -> Self {
        self.field(Quantity::DHeat, alias)
    }

    pub fn into_query(self) -> Query {
        self.query
    }
}

impl Timeseries for Series {
    fn time_filter(mut self) -> Self {
        self.query = self.query.time_filter();
        self
    }

    fn ordered(mut self) -> Self {
        self.query = self.query.ordered();
        self
    }

    fn time_not_null(mut self) -> Self {
        self.query = self.query.time_not_null();
        self
    }
}

impl From<Series> for Query {
    fn from(series: Series) -> Self {
        series.into_query()
    }
}
