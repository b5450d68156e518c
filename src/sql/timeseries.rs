//! Time-domain conveniences on top of [`Query`].
//!
//! Every physical table carries a `time` column; these helpers add the host
//! time-range filter, ordering, and the full-outer join chain that aligns
//! independently sampled sources on that column.

use super::fragment::Join;
use super::query::Query;

/// Host placeholder restricting `time` to the dashboard's selected range.
pub const TIME_FILTER: &str = "$__timeFilter(time)";

/// Host placeholder for the start of the selected range.
pub const TIME_FROM: &str = "$__timeFrom()";

/// Host placeholder for the end of the selected range.
pub const TIME_TO: &str = "$__timeTo()";

/// WHERE-token mutators for time-indexed queries.
pub trait Timeseries: Sized {
    /// Append `AND $__timeFilter(time)`; expects a preceding predicate.
    fn time_filter(self) -> Self;

    /// Append `ORDER BY time`; must come after every predicate token.
    fn ordered(self) -> Self;

    /// Append `time IS NOT NULL`.
    fn time_not_null(self) -> Self;
}

impl Timeseries for Query {
    fn time_filter(self) -> Self {
        self.where_token("AND").where_token(TIME_FILTER)
    }

    fn ordered(self) -> Self {
        self.where_token("ORDER BY time")
    }

    fn time_not_null(self) -> Self {
        self.where_token("time IS NOT NULL")
    }
}

/// Full-outer joins from `anchor` to `<basename><id>` for every id, in order.
///
/// The anchor's own id must already be excluded by the caller. Full outer
/// (never inner) so a timestamp sampled by only one source survives.
pub fn time_join(anchor: &str, basename: &str, ids: &[u32]) -> Vec<Join> {
    ids.iter()
        .map(|id| {
            let relation = format!("{basename}{id}");
            let condition = format!("{anchor}.time = {relation}.time");
            Join::full_outer(relation, condition)
        })
        .collect()
}
