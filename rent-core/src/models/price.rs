use crate::models::Precision;

/// One price per good, held as whole currency units.
///
/// Holding integer units is what allows a reconciled price vector to sum to
/// the budget exactly; amounts are only materialized as `f64` on the way out.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "Vec<f64>"))]
pub struct PriceVector {
    units: Vec<i64>,
    precision: Precision,
}

impl PriceVector {
    /// Build a price vector from unit counts, indexed by good
    pub fn from_units(units: Vec<i64>, precision: Precision) -> Self {
        Self { units, precision }
    }

    /// The number of goods
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether there are no goods
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The price of `good`
    pub fn price(&self, good: usize) -> f64 {
        self.precision.from_units(self.units[good])
    }

    /// All prices, indexed by good
    pub fn prices(&self) -> Vec<f64> {
        self.units
            .iter()
            .map(|&units| self.precision.from_units(units))
            .collect()
    }

    /// The unit counts, indexed by good
    pub fn units(&self) -> &[i64] {
        &self.units
    }

    /// The sum of all prices, computed exactly in units
    pub fn total_units(&self) -> i64 {
        self.units.iter().sum()
    }

    /// The sum of all prices
    pub fn total(&self) -> f64 {
        self.precision.from_units(self.total_units())
    }

    /// The precision the prices are expressed in
    pub fn precision(&self) -> Precision {
        self.precision
    }
}

impl From<PriceVector> for Vec<f64> {
    fn from(value: PriceVector) -> Self {
        value.prices()
    }
}
