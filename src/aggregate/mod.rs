//! Cross-family aggregation.
//!
//! A [`Combination`] folds several device families into one arithmetic
//! column over one time-aligned join chain. Each [`Source`] contributes every
//! one of its ids with a fixed [`Sign`]; the first id of the first non-empty
//! source anchors the chain, every other staged relation is full-outer
//! joined to it.

pub mod consumption;
pub mod heating;
pub mod production;

pub use consumption::Consumption;
pub use heating::Heating;
pub use production::Production;

use tracing::debug;

use crate::proxy::{ProxyField, ProxyQuery};
use crate::series::{coalesce_zero, delta_terms, Family, Quantity};
use crate::sql::{quote_alias, time_join, Field, Join, Query, Timeseries};

/// Physical sign of a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// One family's devices inside a combination.
#[derive(Debug, Clone)]
pub struct Source {
    pub family: &'static Family,
    pub ids: Vec<u32>,
    pub sign: Sign,
    /// The quantity combined across sources.
    pub quantity: Quantity,
    /// Extra quantities staged alongside, for fields computed by the caller.
    pub also: Vec<Quantity>,
}

impl Source {
    pub fn new(family: &'static Family, ids: &[u32], sign: Sign, quantity: Quantity) -> Self {
        Self {
            family,
            ids: ids.to_vec(),
            sign,
            quantity,
            also: Vec::new(),
        }
    }

    pub fn plus(family: &'static Family, ids: &[u32], quantity: Quantity) -> Self {
        Self::new(family, ids, Sign::Plus, quantity)
    }

    pub fn minus(family: &'static Family, ids: &[u32], quantity: Quantity) -> Self {
        Self::new(family, ids, Sign::Minus, quantity)
    }

    /// Stage `quantity` in this source's CTEs as well.
    pub fn also(mut self, quantity: Quantity) -> Self {
        if !self.also.contains(&quantity) {
            self.also.push(quantity);
        }
        self
    }

    /// Staged column the combined term reads: the counter for window deltas.
    fn staged(&self) -> Quantity {
        self.quantity.counter().unwrap_or(self.quantity)
    }

    fn staged_all(&self) -> Vec<Quantity> {
        let mut quantities = vec![self.staged()];
        quantities.extend(self.also.iter().filter(|q| **q != self.staged()));
        quantities
    }
}

/// Signed sum of sources over a shared time axis.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct Combination {
    /// Alias prefix of the combined columns, e.g. `production`.
    name: &'static str,
    sources: Vec<Source>,
}

impl Combination {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sources: Vec::new(),
        }
    }

    pub fn source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    /// True when no source has any device.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    fn active(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter().filter(|s| !s.ids.is_empty())
    }

    /// Quoted combined alias, e.g. `"production.power_w"`.
    pub fn alias(&self, label: &str) -> String {
        quote_alias(&format!("{}.{}", self.name, label))
    }

    /// First id of the first non-empty source.
    ///
    /// # Panics
    ///
    /// When the combination has no device at all.
    pub fn anchor(&self) -> String {
        match self.active().next() {
            Some(source) => source.family.relation(source.ids[0]),
            None => panic!("{}: combination without any device", self.name),
        }
    }

    /// Every staged relation, anchor first.
    pub fn relations(&self) -> Vec<String> {
        self.active().flat_map(|s| s.family.relations(&s.ids)).collect()
    }

    /// Per-device CTEs in source order.
    pub fn ctes(&self) -> Vec<Query> {
        self.active()
            .flat_map(|s| s.family.ctes(&s.ids, &s.staged_all()))
            .collect()
    }

    /// Full-outer joins of every relation but the anchor onto the anchor.
    pub fn joins(&self) -> Vec<Join> {
        let anchor = self.anchor();
        debug!(combination = self.name, anchor = %anchor, "anchored join chain");
        self.active()
            .enumerate()
            .flat_map(|(i, s)| {
                let ids = if i == 0 { &s.ids[1..] } else { &s.ids[..] };
                time_join(&anchor, s.family.basename, ids)
            })
            .collect()
    }

    fn terms(&self, term: impl Fn(&Source, u32) -> String) -> Vec<(Sign, String)> {
        self.active()
            .flat_map(|s| s.ids.iter().map(|id| (s.sign, term(s, *id))).collect::<Vec<_>>())
            .collect()
    }

    /// The one-term shortcut: a single positive device.
    fn single(&self) -> Option<(&Source, u32)> {
        let mut active = self.active();
        match (active.next(), active.next()) {
            (Some(source), None) if source.ids.len() == 1 && source.sign == Sign::Plus => {
                Some((source, source.ids[0]))
            }
            _ => None,
        }
    }

    /// Null-safe signed sum of each source's quantity, aliased `"<name>.<label>"`.
    pub fn sum_field(&self, label: &str) -> Field {
        let alias = self.alias(label);
        if let Some((source, id)) = self.single() {
            return Field::new(source.family.column(id, source.quantity), Some(&alias));
        }

        let terms = self.terms(|s, id| coalesce_zero(&s.family.column(id, s.quantity)));
        let mut expr = String::new();
        for (i, (sign, term)) in terms.iter().enumerate() {
            match (i, sign) {
                (0, Sign::Plus) => {}
                (0, Sign::Minus) => expr.push('-'),
                (_, Sign::Plus) => expr.push_str(" + "),
                (_, Sign::Minus) => expr.push_str(" - "),
            }
            expr.push_str(term);
        }
        Field::new(expr, Some(&alias))
    }

    /// Window total of each source's counter, signed, aliased `"<name>.<label>"`.
    pub fn delta_field(&self, label: &str) -> Field {
        let alias = self.alias(label);
        let terms = self.terms(|s, id| {
            let column = s.family.column(id, s.staged());
            match s.sign {
                Sign::Plus => delta_terms(&column),
                Sign::Minus => format!("-COALESCE(MAX({column}),0)+COALESCE(MIN({column}),0)"),
            }
        });
        let mut expr = String::new();
        for (i, (sign, term)) in terms.iter().enumerate() {
            if i > 0 && *sign == Sign::Plus {
                expr.push('+');
            }
            expr.push_str(term);
        }
        Field::new(expr, Some(&alias))
    }

    /// Staged sources joined inside a proxy; callers append fields.
    pub fn proxy(&self) -> ProxyQuery {
        ProxyQuery::new(self.ctes(), self.relations(), self.joins())
    }

    /// Time series of the combined quantity.
    ///
    /// # Panics
    ///
    /// When a source carries a window-delta quantity.
    pub fn query_sum(&self, label: &str) -> Query {
        for source in self.active() {
            source.quantity.expect_instant(self.name);
        }
        if let Some((source, id)) = self.single() {
            debug!(combination = self.name, id, "single-device combination");
            return source
                .family
                .series(id)
                .time()
                .field(source.quantity, Some(&self.alias(label)))
                .time_filter()
                .ordered()
                .into_query();
        }
        self.proxy()
            .field(ProxyField::new(self.sum_field(label)))
            .into_query()
    }

    /// Window total of the combined counter; every source quantity must be a
    /// window-delta quantity.
    pub fn query_delta(&self, label: &str) -> Query {
        for source in self.active() {
            assert!(
                source.quantity.is_delta(),
                "{}: {:?} is not a window-delta quantity",
                self.name,
                source.quantity
            );
        }
        if let Some((source, id)) = self.single() {
            debug!(combination = self.name, id, "single-device window total");
            return source
                .family
                .series(id)
                .field(source.quantity, Some(&self.alias(label)))
                .time_filter()
                .into_query();
        }
        Query::new()
            .subqueries(self.ctes())
            .field(self.delta_field(label))
            .from(self.anchor())
            .joins(self.joins())
    }
}
