mod solver;
pub use solver::{LinearSolver, PricingError};
