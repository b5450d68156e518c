//! Hot water boilers with three temperature sensors.

use super::{Family, FieldDef, Quantity};
use crate::sql::Query;

const CATALOG: &[FieldDef] = &[
    FieldDef::column(Quantity::Top, "top"),
    FieldDef::column(Quantity::Mid, "mid"),
    FieldDef::column(Quantity::Bot, "bot"),
];

pub static BOILER: Family = Family::new("boiler", "boiler", CATALOG);

/// Query factories for boilers.
pub struct Boiler;

impl Boiler {
    /// Top, middle and bottom temperature of each boiler.
    pub fn query_temps(ids: &[u32]) -> Query {
        BOILER.query_each(ids, &[Quantity::Top, Quantity::Mid, Quantity::Bot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temps_single_id() {
        assert_eq!(
            Boiler::query_temps(&[1]).render(),
            "SELECT time, top AS \"boiler1.top\", mid AS \"boiler1.mid\", bot AS \"boiler1.bot\" \
             FROM boiler WHERE series_id = 1 AND $__timeFilter(time) ORDER BY time"
        );
    }
}
