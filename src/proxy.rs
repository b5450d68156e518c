//! Proxy queries: per-device relations merged into one time-aligned row set.
//!
//! A proxy query hoists the staged series into the outer `WITH` clause,
//! full-outer joins them inside a derived table named `proxy`, and selects the
//! quoted output aliases from it:
//!
//! ```text
//! WITH solar1 AS (..), solar8 AS (..)
//! SELECT time, "solar.power_w"
//! FROM (SELECT COALESCE(solar1.time, solar8.time) AS time, .. AS "solar.power_w"
//!       FROM solar1 FULL OUTER JOIN solar8 ON solar1.time = solar8.time OFFSET 0) AS proxy
//! WHERE time IS NOT NULL ORDER BY time
//! ```
//!
//! `OFFSET 0` keeps PostgreSQL from flattening the derived table into the
//! outer query.

use tracing::debug;

use crate::series::{Family, Quantity, TIME};
use crate::sql::{Field, Fragment, Join, Query, Render, Timeseries, Token, TokenStream};

/// Name of the derived table every proxy query selects from.
pub const PROXY: &str = "proxy";

/// The unified `time` column of a set of full-outer-joined relations.
pub struct TimeProxy;

impl TimeProxy {
    /// `rel.time AS time` for one relation, `COALESCE(a.time, b.time, ..) AS time` otherwise.
    ///
    /// # Panics
    ///
    /// When `relations` is empty.
    pub fn field(relations: &[String]) -> Field {
        let columns: Vec<String> = relations.iter().map(|rel| format!("{rel}.{TIME}")).collect();
        match columns.as_slice() {
            [] => panic!("time proxy over an empty relation list"),
            [single] => Field::new(single.as_str(), Some(TIME)),
            _ => Field::new(format!("COALESCE({})", columns.join(", ")), Some(TIME)),
        }
    }
}

/// A field computed inside the proxy and re-selected by its alias outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyField {
    inner: Field,
}

impl ProxyField {
    pub fn new(inner: Field) -> Self {
        Self { inner }
    }

    /// Staged column `quantity` of `family` device `id`, exposed as
    /// `"<relation>.<label>"`; the label defaults to the catalog alias.
    pub fn column(family: &Family, id: u32, quantity: Quantity, label: Option<&str>) -> Self {
        let label = label.unwrap_or(family.def(quantity).alias);
        let alias = family.per_id_alias(id, label);
        Self::new(Field::new(family.column(id, quantity), Some(&alias)))
    }

    /// The field as computed inside the derived table.
    pub fn inner(&self) -> &Field {
        &self.inner
    }

    /// The field as selected from the derived table.
    pub fn outer(&self) -> Field {
        Field::bare(self.inner.alias.as_str())
    }
}

// =============================================================================
// ProxyQuery
// =============================================================================

/// Staged relations plus the fields computed over their time-aligned join.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct ProxyQuery {
    ctes: Vec<Query>,
    relations: Vec<String>,
    joins: Vec<Join>,
    fields: Vec<ProxyField>,
}

impl ProxyQuery {
    /// `relations[0]` is the FROM anchor; `joins` attach the rest.
    ///
    /// # Panics
    ///
    /// When `relations` is empty.
    pub fn new(ctes: Vec<Query>, relations: Vec<String>, joins: Vec<Join>) -> Self {
        assert!(!relations.is_empty(), "proxy query over an empty relation list");
        Self {
            ctes,
            relations,
            joins,
            fields: Vec::new(),
        }
    }

    /// Append a computed field.
    pub fn field(mut self, field: ProxyField) -> Self {
        self.fields.push(field);
        self
    }

    /// The derived table's SELECT, without the staged CTEs.
    pub fn inner_query(&self) -> Query {
        let fields = std::iter::once(TimeProxy::field(&self.relations))
            .chain(self.fields.iter().map(|f| f.inner().clone()))
            .collect();
        Query::new()
            .fields(fields)
            .from(self.relations[0].as_str())
            .joins(self.joins.clone())
    }

    /// `(<inner> OFFSET 0) AS proxy`
    pub fn fragment(&self) -> Fragment {
        let mut ts = TokenStream::new();
        ts.lparen()
            .append(&self.inner_query().to_tokens())
            .space()
            .push(Token::Offset)
            .space()
            .push(Token::LitInt(0))
            .rparen()
            .space()
            .push(Token::As)
            .space()
            .raw(PROXY);
        Fragment::new(ts.serialize(Default::default()))
    }

    pub fn into_query(self) -> Query {
        debug!(relations = ?self.relations, fields = self.fields.len(), "proxy query");
        let fragment = self.fragment();
        let fields = std::iter::once(Field::bare(TIME))
            .chain(self.fields.iter().map(ProxyField::outer))
            .collect();
        Query::new()
            .subqueries(self.ctes)
            .fields(fields)
            .from(fragment)
            .time_not_null()
            .ordered()
    }
}

impl From<ProxyQuery> for Query {
    fn from(proxy: ProxyQuery) -> Self {
        proxy.into_query()
    }
}

/// Staged series of one family for `ids`, joined on time from the first id.
fn staged(family: &'static Family, ids: &[u32], quantities: &[Quantity]) -> ProxyQuery {
    let Some((anchor, rest)) = ids.split_first() else {
        panic!("proxy: empty id list for family '{}'", family.basename);
    };
    let anchor = family.relation(*anchor);
    let joins = family.time_join(&anchor, rest);
    ProxyQuery::new(family.ctes(ids, quantities), family.relations(ids), joins)
}

/// Appends `q` unless already present, keeping first-seen order.
fn push_unique(quantities: &mut Vec<Quantity>, q: Quantity) {
    if !quantities.contains(&q) {
        quantities.push(q);
    }
}

// =============================================================================
// TimeseriesProxy
// =============================================================================

/// Every selected quantity of every device as its own output column.
///
/// Columns are grouped by device, in id order, then in the order quantities
/// were added.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct TimeseriesProxy {
    family: &'static Family,
    ids: Vec<u32>,
    channels: Vec<(Quantity, Option<String>)>,
}

impl TimeseriesProxy {
    pub fn new(family: &'static Family, ids: &[u32]) -> Self {
        Self {
            family,
            ids: ids.to_vec(),
            channels: Vec::new(),
        }
    }

    /// Add `quantity` under its catalog alias.
    pub fn quantity(mut self, quantity: Quantity) -> Self {
        quantity.expect_instant("proxy");
        self.channels.push((quantity, None));
        self
    }

    /// Add `quantity` under the output label `label`.
    pub fn labelled(mut self, quantity: Quantity, label: &str) -> Self {
        quantity.expect_instant("proxy");
        self.channels.push((quantity, Some(label.to_string())));
        self
    }

    pub fn into_proxy(self) -> ProxyQuery {
        let mut quantities = Vec::new();
        for (q, _) in &self.channels {
            push_unique(&mut quantities, *q);
        }

        let family = self.family;
        let mut proxy = staged(family, &self.ids, &quantities);
        for id in &self.ids {
            for (q, label) in &self.channels {
                proxy = proxy.field(ProxyField::column(family, *id, *q, label.as_deref()));
            }
        }
        proxy
    }

    pub fn into_query(self) -> Query {
        self.into_proxy().into_query()
    }
}

// =============================================================================
// AggregateProxy
// =============================================================================

/// Family-wide combinations of one quantity across devices.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct AggregateProxy {
    family: &'static Family,
    ids: Vec<u32>,
    fields: Vec<ProxyField>,
    quantities: Vec<Quantity>,
}

impl AggregateProxy {
    pub fn new(family: &'static Family, ids: &[u32]) -> Self {
        Self {
            family,
            ids: ids.to_vec(),
            fields: Vec::new(),
            quantities: Vec::new(),
        }
    }

    fn combined_alias(&self, quantity: Quantity) -> String {
        self.family.combined_alias(self.family.def(quantity).alias)
    }

    /// Null-safe sum of `quantity`, aliased `"<basename>.<alias>"`.
    pub fn sum(mut self, quantity: Quantity) -> Self {
        quantity.expect_instant("proxy sum");
        let alias = self.combined_alias(quantity);
        let field = self.family.ps(&self.ids, quantity, Some(&alias));
        push_unique(&mut self.quantities, quantity);
        self.fields.push(ProxyField::new(field));
        self
    }

    /// Average of `quantity` over the devices reporting more than `valid_above`.
    pub fn average(mut self, quantity: Quantity, valid_above: &str) -> Self {
        quantity.expect_instant("proxy average");
        let alias = self.combined_alias(quantity);
        let field = self.family.pa(&self.ids, quantity, valid_above, Some(&alias));
        push_unique(&mut self.quantities, quantity);
        self.fields.push(ProxyField::new(field));
        self
    }

    pub fn into_proxy(self) -> ProxyQuery {
        self.fields
            .into_iter()
            .fold(staged(self.family, &self.ids, &self.quantities), ProxyQuery::field)
    }

    pub fn into_query(self) -> Query {
        self.into_proxy().into_query()
    }
}
