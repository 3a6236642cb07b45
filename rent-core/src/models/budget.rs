use crate::models::Precision;

/// The total amount to be divided, validated against a currency precision.
///
/// A budget is finite, strictly positive, and lies on the precision's grid;
/// the engine relies on the latter to balance prices exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget {
    amount: f64,
    units: i64,
}

impl Budget {
    /// Validate `amount` as a budget on the grid of `precision`
    pub fn new(amount: f64, precision: Precision) -> Result<Self, BudgetError> {
        if !amount.is_finite() {
            return Err(BudgetError::NotFinite);
        }
        if amount <= 0.0 {
            return Err(BudgetError::NotPositive(amount));
        }
        if !precision.is_on_grid(amount) {
            return Err(BudgetError::OffGrid {
                amount,
                decimals: precision.decimals(),
            });
        }
        Ok(Self {
            amount,
            units: precision.to_units(amount),
        })
    }

    /// The budget as supplied by the caller
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The budget as a whole number of currency units
    pub fn units(&self) -> i64 {
        self.units
    }
}

/// Errors that can occur when validating a budget
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BudgetError {
    /// The budget is NaN or infinite
    #[error("budget must be finite")]
    NotFinite,
    /// The budget is zero or negative
    #[error("budget must be positive, got {0}")]
    NotPositive(f64),
    /// The budget has more precision than the currency supports
    #[error("budget {amount} is not a whole number of units at {decimals} decimals")]
    OffGrid {
        /// The supplied budget
        amount: f64,
        /// The precision's decimals
        decimals: u32,
    },
}
