use rent_core::models::{Budget, Precision, PriceVector};
use tracing::{Level, event};

/// Round raw prices onto the currency grid so that they sum to the budget
/// exactly.
///
/// Each price is rounded to the nearest unit, and whatever residual remains
/// (positive or negative) is added to the highest-priced good, the lowest
/// index winning ties. The adjusted good moves by at most half a unit per good.
pub fn reconcile(raw: &[f64], budget: &Budget, precision: Precision) -> PriceVector {
    let mut units = raw
        .iter()
        .map(|&price| precision.to_units(price))
        .collect::<Vec<_>>();

    let residual = budget.units() - units.iter().sum::<i64>();

    // `max_by_key` keeps the last maximum, so search in reverse for the first
    if let Some((highest, _)) = units
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|&(_, &price)| price)
    {
        units[highest] += residual;
        event!(Level::DEBUG, residual, good = highest, "reconciled prices");
    }

    PriceVector::from_units(units, precision)
}
