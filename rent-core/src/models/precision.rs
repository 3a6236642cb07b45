/// The currency's smallest unit, expressed as a number of decimal places.
///
/// This is the single source of the rounding grid used when reconciling
/// prices, the grid a budget must lie on, and the tolerance used when
/// certifying envy-freeness. The default is two decimals, i.e. one cent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PrecisionDto", into = "PrecisionDto")
)]
pub struct Precision {
    decimals: u32,
}

// Comparisons on the grid must ignore floating-point noise far below one unit.
const NOISE: f64 = 1e-6;

impl Precision {
    /// The finest supported grid. Beyond this, unit counts of realistic budgets
    /// approach the limits of f64's exact integer range.
    pub const MAX_DECIMALS: u32 = 9;

    /// Creates a new precision with the given number of decimals
    pub fn new(decimals: u32) -> Result<Self, PrecisionError> {
        Self::try_from(PrecisionDto { decimals })
    }

    /// The number of decimal places
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// How many units make up one whole currency amount (100 for cents)
    pub fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    /// The value of one unit (0.01 for cents)
    pub fn unit(&self) -> f64 {
        1.0 / self.scale()
    }

    /// Round an amount to the nearest whole number of units
    pub fn to_units(&self, amount: f64) -> i64 {
        (amount * self.scale()).round() as i64
    }

    /// Convert a number of units back into an amount
    pub fn from_units(&self, units: i64) -> f64 {
        units as f64 / self.scale()
    }

    /// Whether `amount` lies on the grid, up to floating-point noise
    pub fn is_on_grid(&self, amount: f64) -> bool {
        let scaled = amount * self.scale();
        (scaled - scaled.round()).abs() <= NOISE
    }

    /// The tolerance for envy checks: one unit, plus an allowance for
    /// floating-point noise so that an exact one-unit perturbation from
    /// reconciliation is not mistaken for envy.
    pub fn tolerance(&self) -> f64 {
        self.unit() * (1.0 + NOISE)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

/// A DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct PrecisionDto {
    /// The number of decimal places
    pub decimals: u32,
}

impl From<Precision> for PrecisionDto {
    fn from(value: Precision) -> Self {
        Self {
            decimals: value.decimals,
        }
    }
}

impl TryFrom<PrecisionDto> for Precision {
    type Error = PrecisionError;

    fn try_from(value: PrecisionDto) -> Result<Self, Self::Error> {
        if value.decimals > Self::MAX_DECIMALS {
            return Err(PrecisionError::TooFine(value.decimals));
        }
        Ok(Self {
            decimals: value.decimals,
        })
    }
}

/// Errors that can occur when creating a Precision
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PrecisionError {
    /// Too many decimal places
    #[error("{0} decimals exceeds the supported maximum of {max}", max = Precision::MAX_DECIMALS)]
    TooFine(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents() {
        let cents = Precision::default();
        assert_eq!(cents.decimals(), 2);
        assert_eq!(cents.to_units(1633.3333), 163333);
        assert_eq!(cents.to_units(-0.004), 0);
        assert_eq!(cents.from_units(163334), 1633.34);
        assert!(cents.is_on_grid(8150.0));
        assert!(cents.is_on_grid(0.1 + 0.2));
        assert!(!cents.is_on_grid(10.005));
    }

    #[test]
    fn test_whole_units() {
        let dollars = Precision::new(0).unwrap();
        assert_eq!(dollars.unit(), 1.0);
        assert_eq!(dollars.to_units(2.5), 3);
        assert!(!dollars.is_on_grid(2.5));
    }

    #[test]
    fn test_tolerance_covers_one_unit() {
        let cents = Precision::default();
        let (mine, alt) = (366.66, 366.67);
        assert!(alt - mine <= cents.tolerance());
        assert!(366.69 - mine > cents.tolerance());
    }

    #[test]
    fn test_too_fine() {
        assert_eq!(
            Precision::new(12).unwrap_err(),
            PrecisionError::TooFine(12)
        );
    }
}
