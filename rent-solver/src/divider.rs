use crate::{assignment, pricing, reconcile, verify};
use rent_core::{
    models::{
        Allocation, Assignment, Budget, BudgetError, Division, Precision, PriceVector, SolveResult,
        ValuationMatrix,
    },
    ports::{LinearSolver, PricingError},
};
use std::hash::Hash;
use tracing::{Level, event};

/// Configuration for a [`RentDivider`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DividerSettings {
    /// The currency grid prices are reconciled onto
    pub precision: Precision,
}

/// The rent division engine.
///
/// Composes the welfare-maximizing assignment, the envy-free maximin pricing
/// program, reconciliation onto the currency grid, and certification. The
/// divider holds no state between calls; one instance may serve any number of
/// independent divisions, concurrently if the backend allows it.
pub struct RentDivider<S: LinearSolver> {
    solver: S,
    settings: DividerSettings,
}

impl<S: LinearSolver> RentDivider<S> {
    /// Create a divider around an LP backend
    pub fn new(solver: S, settings: DividerSettings) -> Self {
        Self { solver, settings }
    }

    /// The divider's configuration
    pub fn settings(&self) -> &DividerSettings {
        &self.settings
    }

    /// Divide `budget` among the agents of `valuations`.
    ///
    /// Only invalid input is an error. When no envy-free price vector can be
    /// found, the result falls back to proportional pricing and is returned
    /// with `is_envy_free == false`.
    pub fn solve(
        &self,
        valuations: &ValuationMatrix,
        budget: f64,
    ) -> Result<SolveResult, DivisionError> {
        let precision = self.settings.precision;
        let budget = Budget::new(budget, precision)?;

        let assignment = assignment::welfare_maximizing(valuations);

        let priced = pricing::price(&self.solver, valuations, &assignment, &budget).and_then(
            |raw| {
                let prices = reconcile::reconcile(&raw.prices, &budget, precision);
                if prices.units().iter().any(|&units| units < 0) {
                    // Only reachable when the program is feasible in exact
                    // arithmetic but has no non-negative point on the grid
                    Err(PricingError::Infeasible)
                } else {
                    Ok(prices)
                }
            },
        );

        let result = match priced {
            Ok(prices) => {
                let is_envy_free = verify::is_envy_free(
                    valuations,
                    &assignment,
                    &prices.prices(),
                    precision.tolerance(),
                );
                SolveResult::new(valuations, assignment, prices, is_envy_free, budget.amount())
            }
            Err(error) => {
                event!(
                    Level::WARN,
                    %error,
                    "pricing failed, falling back to proportional prices"
                );
                let prices = proportional(valuations, &assignment, &budget, precision);
                SolveResult::new(valuations, assignment, prices, false, budget.amount())
            }
        };

        event!(
            Level::DEBUG,
            min_utility = result.min_utility,
            is_envy_free = result.is_envy_free,
            "divided budget"
        );

        Ok(result)
    }

    /// Solve a labelled division, returning the labelled allocation
    pub fn divide<AgentId: Eq + Hash + Clone, GoodId: Eq + Hash + Clone>(
        &self,
        division: &Division<AgentId, GoodId>,
    ) -> Result<Allocation<AgentId, GoodId>, DivisionError> {
        let result = self.solve(division.valuations(), division.budget())?;
        Ok(division.label(&result))
    }
}

#[cfg(feature = "clarabel")]
impl Default for RentDivider<crate::impls::clarabel::ClarabelSolver> {
    fn default() -> Self {
        Self::new(Default::default(), Default::default())
    }
}

/// Price each assigned good in proportion to its holder's valuation of it,
/// reconciled onto the grid. When every assigned valuation is zero, the budget
/// is split equally.
///
/// This carries no fairness guarantee; it exists so that every input yields a
/// budget-balanced allocation.
pub fn proportional(
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    budget: &Budget,
    precision: Precision,
) -> PriceVector {
    let n = assignment.len();
    let assigned = valuations.assigned(assignment);
    let total = assigned.iter().sum::<f64>();

    let mut raw = vec![0.0; n];
    for (agent, good) in assignment.iter() {
        raw[good] = if total > 0.0 {
            assigned[agent] / total * budget.amount()
        } else {
            budget.amount() / n as f64
        };
    }

    reconcile::reconcile(&raw, budget, precision)
}

/// Errors returned for invalid division input
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DivisionError {
    /// The budget is unusable
    #[error(transparent)]
    Budget(#[from] BudgetError),
}
