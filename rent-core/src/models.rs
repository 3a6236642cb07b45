mod allocation;
mod assignment;
mod budget;
mod map;
mod outcome;
mod precision;
mod price;
mod program;
mod valuation;

pub use allocation::{Allocation, Division, LabelError, Placement, SwapReport};
pub use assignment::{Assignment, AssignmentError};
pub use budget::{Budget, BudgetError};
pub use map::Map;
pub use outcome::{SolveResult, Swap, utilities};
pub use precision::{Precision, PrecisionError};
pub use price::PriceVector;
pub use program::{Constraint, LinearProgram, Sense};
pub use valuation::{ValuationError, ValuationMatrix};
