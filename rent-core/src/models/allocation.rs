use crate::models::{
    Assignment, AssignmentError, Map, SolveResult, Swap, ValuationError, ValuationMatrix,
};
use std::hash::Hash;

/// A rent division problem whose agents and goods carry caller-supplied ids.
///
/// Ids are used only to label the output; the engine works on positions in
/// the `agents` and `goods` lists, which are parallel to the rows and columns
/// of the valuation matrix.
#[derive(Clone, Debug)]
pub struct Division<AgentId: Eq + Hash, GoodId: Eq + Hash> {
    budget: f64,
    agents: Map<AgentId, usize>,
    goods: Map<GoodId, usize>,
    valuations: ValuationMatrix,
}

impl<AgentId: Eq + Hash + Clone, GoodId: Eq + Hash + Clone> Division<AgentId, GoodId> {
    /// Label a valuation matrix with agent and good ids
    pub fn new(
        budget: f64,
        agents: impl IntoIterator<Item = AgentId>,
        goods: impl IntoIterator<Item = GoodId>,
        valuations: ValuationMatrix,
    ) -> Result<Self, LabelError> {
        let n = valuations.size();
        let agents = index(agents, LabelError::DuplicateAgent)?;
        let goods = index(goods, LabelError::DuplicateGood)?;

        if agents.len() != n {
            return Err(LabelError::AgentCount {
                len: agents.len(),
                expected: n,
            });
        }
        if goods.len() != n {
            return Err(LabelError::GoodCount {
                len: goods.len(),
                expected: n,
            });
        }

        Ok(Self {
            budget,
            agents,
            goods,
            valuations,
        })
    }

    /// Build a division from sparse bids. An agent who placed no bid on a
    /// good is taken to value it at zero.
    pub fn from_bids<B: IntoIterator<Item = (GoodId, f64)>>(
        budget: f64,
        agents: impl IntoIterator<Item = AgentId>,
        goods: impl IntoIterator<Item = GoodId>,
        bids: impl IntoIterator<Item = (AgentId, B)>,
    ) -> Result<Self, LabelError> {
        let agents = index(agents, LabelError::DuplicateAgent)?;
        let goods = index(goods, LabelError::DuplicateGood)?;

        let mut rows = vec![vec![0.0; goods.len()]; agents.len()];
        for (agent_id, row) in bids {
            let agent = *agents.get(&agent_id).ok_or(LabelError::UnknownAgent)?;
            for (good_id, value) in row {
                let good = *goods.get(&good_id).ok_or(LabelError::UnknownGood)?;
                rows[agent][good] = value;
            }
        }

        Self::new(
            budget,
            agents.into_iter().map(|(id, _)| id),
            goods.into_iter().map(|(id, _)| id),
            ValuationMatrix::new(rows)?,
        )
    }

    /// The total amount to divide
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// The valuation matrix, rows by agent position and columns by good position
    pub fn valuations(&self) -> &ValuationMatrix {
        &self.valuations
    }

    /// The agent ids, in row order
    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.keys()
    }

    /// The good ids, in column order
    pub fn goods(&self) -> impl Iterator<Item = &GoodId> {
        self.goods.keys()
    }

    /// The row of the agent with the given id
    pub fn agent_index(&self, id: &AgentId) -> Result<usize, LabelError> {
        self.agents.get(id).copied().ok_or(LabelError::UnknownAgent)
    }

    /// The column of the good with the given id
    pub fn good_index(&self, id: &GoodId) -> Result<usize, LabelError> {
        self.goods.get(id).copied().ok_or(LabelError::UnknownGood)
    }

    fn agent_id(&self, agent: usize) -> &AgentId {
        // ASSERTION: positions are only ever produced from results over this division
        self.agents.get_index(agent).map(|(id, _)| id).unwrap()
    }

    fn good_id(&self, good: usize) -> &GoodId {
        // ASSERTION: as above
        self.goods.get_index(good).map(|(id, _)| id).unwrap()
    }

    /// Attach this division's ids to an index-based result
    pub fn label(&self, result: &SolveResult) -> Allocation<AgentId, GoodId> {
        let assignment = result
            .assignment
            .iter()
            .map(|(agent, good)| Placement {
                agent: self.agent_id(agent).clone(),
                good: self.good_id(good).clone(),
                price: result.prices.price(good),
                utility: result.utilities[agent],
            })
            .collect();

        Allocation {
            assignment,
            prices: (0..result.prices.len())
                .map(|good| (self.good_id(good).clone(), result.prices.price(good)))
                .collect(),
            utilities: result
                .utilities
                .iter()
                .enumerate()
                .map(|(agent, &utility)| (self.agent_id(agent).clone(), utility))
                .collect(),
            min_utility: result.min_utility,
            is_envy_free: result.is_envy_free,
            total_budget: result.total_budget,
        }
    }

    /// Recover the index-based assignment and prices (indexed by good) from a
    /// labelled allocation, e.g. one previously persisted by a caller.
    pub fn unlabel(
        &self,
        allocation: &Allocation<AgentId, GoodId>,
    ) -> Result<(Assignment, Vec<f64>), LabelError> {
        let n = self.valuations.size();
        if allocation.assignment.len() != n {
            return Err(LabelError::Assignment(AssignmentError::SizeMismatch {
                len: allocation.assignment.len(),
                expected: n,
            }));
        }

        let mut goods = vec![usize::MAX; n];
        let mut prices = vec![0.0; n];
        for placement in allocation.assignment.iter() {
            let agent = self.agent_index(&placement.agent)?;
            let good = self.good_index(&placement.good)?;
            if goods[agent] != usize::MAX {
                return Err(LabelError::DuplicateAgent);
            }
            goods[agent] = good;
            prices[good] = placement.price;
        }

        Ok((Assignment::new(goods)?, prices))
    }
}

fn index<Id: Eq + Hash>(
    ids: impl IntoIterator<Item = Id>,
    duplicate: LabelError,
) -> Result<Map<Id, usize>, LabelError> {
    let mut map = indexmap::IndexMap::<Id, usize, rustc_hash::FxBuildHasher>::default();
    for id in ids {
        let next = map.len();
        if map.insert(id, next).is_some() {
            return Err(duplicate);
        }
    }
    Ok(map.into_iter().collect())
}

/// One agent's place in an allocation
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement<AgentId, GoodId> {
    /// The agent
    pub agent: AgentId,
    /// The good they receive
    pub good: GoodId,
    /// The price they pay
    pub price: f64,
    /// Their valuation of the good minus the price
    pub utility: f64,
}

/// A labelled solve result: the output contract handed back to callers, who
/// typically persist it verbatim.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation<AgentId: Eq + Hash, GoodId: Eq + Hash> {
    /// Who gets what, and at what price, in agent order
    pub assignment: Vec<Placement<AgentId, GoodId>>,
    /// The price of each good; sums to the budget exactly
    pub prices: Map<GoodId, f64>,
    /// Each agent's utility
    pub utilities: Map<AgentId, f64>,
    /// The smallest utility
    pub min_utility: f64,
    /// Whether the allocation was certified envy-free
    pub is_envy_free: bool,
    /// The budget that was divided
    pub total_budget: f64,
}

/// A labelled swap counterfactual between two agents
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapReport<AgentId> {
    /// The first agent
    pub agent_a: AgentId,
    /// The second agent
    pub agent_b: AgentId,
    /// The utilities involved
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub swap: Swap,
}

/// Errors arising from mismatched or unknown ids
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum LabelError {
    /// The number of agent ids does not match the valuation matrix
    #[error("{len} agent ids supplied for {expected} agents")]
    AgentCount {
        /// Ids supplied
        len: usize,
        /// Rows in the valuation matrix
        expected: usize,
    },
    /// The number of good ids does not match the valuation matrix
    #[error("{len} good ids supplied for {expected} goods")]
    GoodCount {
        /// Ids supplied
        len: usize,
        /// Columns in the valuation matrix
        expected: usize,
    },
    /// An agent id appears twice
    #[error("duplicate agent id")]
    DuplicateAgent,
    /// A good id appears twice
    #[error("duplicate good id")]
    DuplicateGood,
    /// An agent id is not part of the division
    #[error("unknown agent id")]
    UnknownAgent,
    /// A good id is not part of the division
    #[error("unknown good id")]
    UnknownGood,
    /// The bids do not form a valid valuation matrix
    #[error(transparent)]
    Valuation(#[from] ValuationError),
    /// The placements do not form a bijection
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Precision, PriceVector};

    fn division() -> Division<&'static str, &'static str> {
        Division::new(
            3000.0,
            ["ana", "ben", "cy"],
            ["a", "b", "c"],
            ValuationMatrix::new(vec![
                vec![1500.0, 1000.0, 800.0],
                vec![900.0, 1400.0, 1000.0],
                vec![800.0, 900.0, 1300.0],
            ])
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_count_mismatch() {
        let valuations = ValuationMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(
            Division::new(10.0, ["x"], ["a", "b"], valuations.clone()).unwrap_err(),
            LabelError::AgentCount {
                len: 1,
                expected: 2
            }
        );
        assert_eq!(
            Division::new(10.0, ["x", "y"], ["a", "b", "c"], valuations.clone()).unwrap_err(),
            LabelError::GoodCount {
                len: 3,
                expected: 2
            }
        );
        assert_eq!(
            Division::new(10.0, ["x", "x"], ["a", "b"], valuations).unwrap_err(),
            LabelError::DuplicateAgent
        );
    }

    #[test]
    fn test_missing_bids_are_zero() {
        let division = Division::from_bids(
            100.0,
            ["x", "y"],
            ["a", "b"],
            [("x", vec![("b", 60.0)]), ("y", vec![("a", 30.0), ("b", 70.0)])],
        )
        .unwrap();
        assert_eq!(division.valuations().row(0), &[0.0, 60.0]);
        assert_eq!(division.valuations().row(1), &[30.0, 70.0]);

        let unknown = Division::from_bids(100.0, ["x"], ["a"], [("z", vec![("a", 1.0)])]);
        assert_eq!(unknown.unwrap_err(), LabelError::UnknownAgent);
    }

    #[test]
    fn test_label_roundtrip() {
        let division = division();
        let prices = PriceVector::from_units(vec![110000, 100000, 90000], Precision::default());
        let result = SolveResult::new(
            division.valuations(),
            Assignment::identity(3),
            prices,
            true,
            3000.0,
        );

        let allocation = division.label(&result);
        assert_eq!(allocation.prices["b"], 1000.0);
        assert_eq!(allocation.utilities["cy"], 400.0);
        assert_eq!(allocation.assignment[0].agent, "ana");
        assert_eq!(allocation.assignment[0].good, "a");
        assert_eq!(allocation.min_utility, 400.0);

        let (assignment, prices) = division.unlabel(&allocation).unwrap();
        assert_eq!(assignment, Assignment::identity(3));
        assert_eq!(prices, vec![1100.0, 1000.0, 900.0]);
    }

    #[test]
    fn test_unlabel_size_mismatch() {
        let division = division();
        let prices = PriceVector::from_units(vec![110000, 100000, 90000], Precision::default());
        let result = SolveResult::new(
            division.valuations(),
            Assignment::identity(3),
            prices,
            true,
            3000.0,
        );

        let mut allocation = division.label(&result);
        allocation.assignment.pop();
        assert_eq!(
            division.unlabel(&allocation).unwrap_err(),
            LabelError::Assignment(AssignmentError::SizeMismatch {
                len: 2,
                expected: 3
            })
        );
    }
}
