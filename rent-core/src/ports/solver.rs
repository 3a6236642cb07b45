use crate::models::LinearProgram;

/// Interface for linear programming backends.
///
/// The pricing step of rent division reduces to "maximize a linear objective
/// subject to dense linear constraints". Any component able to return an
/// optimal point, or to report infeasibility, satisfies the engine; the
/// algorithm it uses (simplex, interior point, ...) is its own business.
pub trait LinearSolver {
    /// The configuration type for this solver
    type Settings;

    /// Create a new instance with the provided settings
    fn new(settings: Self::Settings) -> Self;

    /// Solve the program, returning an optimal point in column order.
    ///
    /// Implementations must return [`PricingError::Infeasible`] when the
    /// constraints admit no solution, rather than an arbitrary point.
    fn maximize(&self, program: &LinearProgram) -> Result<Vec<f64>, PricingError>;
}

/// The ways in which solving for prices can fail
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PricingError {
    /// No price vector satisfies budget balance, envy-freeness and non-negativity
    #[error("no envy-free price vector exists for this assignment and budget")]
    Infeasible,
    /// The objective can be increased without bound
    #[error("the pricing program is unbounded")]
    Unbounded,
    /// The backend gave up, or returned a point that does not satisfy the program
    #[error("linear solver failed: {0}")]
    Failed(String),
}
