use crate::models::{Assignment, PriceVector, ValuationMatrix};

/// The outcome of a single solve, indexed by agent and good.
///
/// A result is produced once per invocation and never modified afterwards.
/// When `is_envy_free` is false the allocation is still budget-balanced and
/// valid, it simply carries no fairness certificate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SolveResult {
    /// The good assigned to each agent
    pub assignment: Assignment,
    /// The price of each good; sums to the budget exactly
    pub prices: PriceVector,
    /// Each agent's valuation of their good minus its price
    pub utilities: Vec<f64>,
    /// The smallest entry of `utilities`
    pub min_utility: f64,
    /// Whether the allocation was certified envy-free
    pub is_envy_free: bool,
    /// The budget that was divided
    pub total_budget: f64,
}

impl SolveResult {
    /// Assemble a result, deriving utilities from the valuations so that they
    /// can never drift from the reported prices.
    pub fn new(
        valuations: &ValuationMatrix,
        assignment: Assignment,
        prices: PriceVector,
        is_envy_free: bool,
        total_budget: f64,
    ) -> Self {
        let utilities = utilities(valuations, &assignment, &prices);
        let min_utility = utilities.iter().copied().fold(f64::INFINITY, f64::min);
        Self {
            assignment,
            prices,
            utilities,
            min_utility,
            is_envy_free,
            total_budget,
        }
    }
}

/// Each agent's quasilinear utility: the valuation of their assigned good,
/// less that good's price.
pub fn utilities(
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    prices: &PriceVector,
) -> Vec<f64> {
    assignment
        .iter()
        .map(|(agent, good)| valuations.get(agent, good) - prices.price(good))
        .collect()
}

/// What two agents would gain by exchanging their (good, price) pairs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swap {
    /// Agent A's utility as allocated
    pub a_current_utility: f64,
    /// Agent A's utility taking B's good at B's price
    pub a_swap_utility: f64,
    /// Whether A strictly prefers B's pair
    pub a_would_swap: bool,
    /// Agent B's utility as allocated
    pub b_current_utility: f64,
    /// Agent B's utility taking A's good at A's price
    pub b_swap_utility: f64,
    /// Whether B strictly prefers A's pair
    pub b_would_swap: bool,
}
