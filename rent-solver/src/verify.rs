use rent_core::models::{
    Allocation, Assignment, Division, LabelError, Precision, Swap, SwapReport, ValuationMatrix,
};
use std::hash::Hash;

/// One agent strictly preferring another agent's (good, price) pair
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envy<AgentId = usize> {
    /// The envious agent
    pub agent: AgentId,
    /// The agent whose pair is preferred
    pub envied: AgentId,
    /// The envious agent's utility as allocated
    pub utility: f64,
    /// The envious agent's utility for the envied agent's pair
    pub alternative: f64,
}

/// List every ordered pair of agents `(i, j)` where `i` would gain more than
/// `epsilon` by taking `j`'s good at `j`'s price. Prices are indexed by good.
pub fn envy(
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    prices: &[f64],
    epsilon: f64,
) -> Vec<Envy> {
    let mut found = Vec::new();
    for (agent, own) in assignment.iter() {
        let utility = valuations.get(agent, own) - prices[own];
        for (other, good) in assignment.iter().filter(|&(other, _)| other != agent) {
            let alternative = valuations.get(agent, good) - prices[good];
            if alternative > utility + epsilon {
                found.push(Envy {
                    agent,
                    envied: other,
                    utility,
                    alternative,
                });
            }
        }
    }
    found
}

/// Whether no agent envies another by more than `epsilon`
pub fn is_envy_free(
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    prices: &[f64],
    epsilon: f64,
) -> bool {
    assignment.iter().all(|(agent, own)| {
        let utility = valuations.get(agent, own) - prices[own];
        assignment
            .iter()
            .all(|(_, good)| valuations.get(agent, good) - prices[good] <= utility + epsilon)
    })
}

/// What agents `a` and `b` would each get by trading their (good, price)
/// pairs. Preference is strict and carries no tolerance.
///
/// # Panics
///
/// Panics if either agent is out of range.
pub fn swap_counterfactual(
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    prices: &[f64],
    a: usize,
    b: usize,
) -> Swap {
    let (good_a, good_b) = (assignment.good_of(a), assignment.good_of(b));

    let a_current_utility = valuations.get(a, good_a) - prices[good_a];
    let a_swap_utility = valuations.get(a, good_b) - prices[good_b];
    let b_current_utility = valuations.get(b, good_b) - prices[good_b];
    let b_swap_utility = valuations.get(b, good_a) - prices[good_a];

    Swap {
        a_current_utility,
        a_swap_utility,
        a_would_swap: a_swap_utility > a_current_utility,
        b_current_utility,
        b_swap_utility,
        b_would_swap: b_swap_utility > b_current_utility,
    }
}

/// The result of re-checking a stored allocation against its division
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Certificate<AgentId> {
    /// Every envious pair, beyond one currency unit
    pub envy: Vec<Envy<AgentId>>,
    /// Whether the prices sum to the division's budget on the currency grid
    pub budget_balanced: bool,
    /// Whether every price is non-negative
    pub non_negative: bool,
    /// Whether the stored price map, utilities and minimum utility agree with
    /// the placements to within half a currency unit
    pub consistent: bool,
}

impl<AgentId> Certificate<AgentId> {
    /// Whether the allocation passes every check
    pub fn is_valid(&self) -> bool {
        self.envy.is_empty() && self.budget_balanced && self.non_negative && self.consistent
    }
}

/// Re-certify a labelled allocation, e.g. one read back from storage
pub fn certify<AgentId: Eq + Hash + Clone, GoodId: Eq + Hash + Clone>(
    division: &Division<AgentId, GoodId>,
    allocation: &Allocation<AgentId, GoodId>,
    precision: Precision,
) -> Result<Certificate<AgentId>, LabelError> {
    let (assignment, prices) = division.unlabel(allocation)?;
    let agents = division.agents().collect::<Vec<_>>();

    let envy = envy(
        division.valuations(),
        &assignment,
        &prices,
        precision.tolerance(),
    )
    .into_iter()
    .map(|envy| Envy {
        agent: agents[envy.agent].clone(),
        envied: agents[envy.envied].clone(),
        utility: envy.utility,
        alternative: envy.alternative,
    })
    .collect();

    let total = prices
        .iter()
        .map(|&price| precision.to_units(price))
        .sum::<i64>();

    Ok(Certificate {
        envy,
        budget_balanced: total == precision.to_units(division.budget()),
        non_negative: prices.iter().all(|&price| price >= 0.0),
        consistent: is_consistent(division, allocation, precision)?,
    })
}

// The placements are authoritative; everything else an allocation stores is
// derived from them and must repeat them.
fn is_consistent<AgentId: Eq + Hash + Clone, GoodId: Eq + Hash + Clone>(
    division: &Division<AgentId, GoodId>,
    allocation: &Allocation<AgentId, GoodId>,
    precision: Precision,
) -> Result<bool, LabelError> {
    let same = |a: f64, b: f64| (a - b).abs() < precision.unit() / 2.0;
    let n = division.valuations().size();
    if allocation.prices.len() != n || allocation.utilities.len() != n {
        return Ok(false);
    }

    let mut min_utility = f64::INFINITY;
    for placement in allocation.assignment.iter() {
        let agent = division.agent_index(&placement.agent)?;
        let good = division.good_index(&placement.good)?;
        let utility = division.valuations().get(agent, good) - placement.price;
        min_utility = min_utility.min(utility);

        let price_agrees = allocation
            .prices
            .get(&placement.good)
            .is_some_and(|&price| same(price, placement.price));
        let utility_agrees = allocation
            .utilities
            .get(&placement.agent)
            .is_some_and(|&stored| same(stored, utility));
        if !price_agrees || !utility_agrees || !same(placement.utility, utility) {
            return Ok(false);
        }
    }

    Ok(same(allocation.min_utility, min_utility))
}

/// The swap counterfactual between two agents of a labelled allocation
pub fn swap<AgentId: Eq + Hash + Clone, GoodId: Eq + Hash + Clone>(
    division: &Division<AgentId, GoodId>,
    allocation: &Allocation<AgentId, GoodId>,
    agent_a: &AgentId,
    agent_b: &AgentId,
) -> Result<SwapReport<AgentId>, LabelError> {
    let (assignment, prices) = division.unlabel(allocation)?;
    let a = division.agent_index(agent_a)?;
    let b = division.agent_index(agent_b)?;

    Ok(SwapReport {
        agent_a: agent_a.clone(),
        agent_b: agent_b.clone(),
        swap: swap_counterfactual(division.valuations(), &assignment, &prices, a, b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_core::models::{Placement, PriceVector, SolveResult};
    use rstest::*;

    fn distinct() -> ValuationMatrix {
        ValuationMatrix::new(vec![
            vec![1500.0, 1000.0, 800.0],
            vec![900.0, 1400.0, 1000.0],
            vec![800.0, 900.0, 1300.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_envy_free() {
        let valuations = distinct();
        let assignment = Assignment::identity(3);
        let prices = [1100.0, 1000.0, 900.0];
        assert!(is_envy_free(&valuations, &assignment, &prices, 0.01));
        assert!(envy(&valuations, &assignment, &prices, 0.01).is_empty());
    }

    #[test]
    fn test_envy_listed() {
        let valuations = distinct();
        let assignment = Assignment::identity(3);
        // Good 0 is too expensive for agent 0, who now prefers good 1
        let prices = [1600.0, 700.0, 700.0];
        let found = envy(&valuations, &assignment, &prices, 0.01);
        assert!(!is_envy_free(&valuations, &assignment, &prices, 0.01));
        assert_eq!(
            found[0],
            Envy {
                agent: 0,
                envied: 1,
                utility: -100.0,
                alternative: 300.0
            }
        );
        assert!(found.iter().all(|envy| envy.alternative > envy.utility));
    }

    #[test]
    fn test_tolerance() {
        let valuations = ValuationMatrix::new(vec![vec![10.0, 10.0], vec![10.0, 10.0]]).unwrap();
        let assignment = Assignment::identity(2);
        // A one cent gap is within tolerance, two cents is not
        let prices = [5.005, 4.995];
        assert!(is_envy_free(
            &valuations,
            &assignment,
            &prices,
            Precision::default().tolerance()
        ));
        let prices = [5.01, 4.99];
        assert!(!is_envy_free(
            &valuations,
            &assignment,
            &prices,
            Precision::default().tolerance()
        ));
    }

    #[test]
    fn test_swap_is_strict() {
        let valuations = distinct();
        let assignment = Assignment::identity(3);
        let prices = [1100.0, 1000.0, 900.0];

        let swap = swap_counterfactual(&valuations, &assignment, &prices, 0, 1);
        assert_eq!(swap.a_current_utility, 400.0);
        assert_eq!(swap.a_swap_utility, 0.0);
        assert!(!swap.a_would_swap);
        assert_eq!(swap.b_current_utility, 400.0);
        assert_eq!(swap.b_swap_utility, -200.0);
        assert!(!swap.b_would_swap);

        // Identical rows at valuation prices: every swap is a tie, which is no reason to swap
        let identical = ValuationMatrix::new(vec![vec![1200.0, 1000.0, 800.0]; 3]).unwrap();
        let swap = swap_counterfactual(&identical, &assignment, &[1200.0, 1000.0, 800.0], 0, 2);
        assert_eq!(swap.a_swap_utility, swap.a_current_utility);
        assert!(!swap.a_would_swap && !swap.b_would_swap);
    }

    #[test]
    fn test_labelled() {
        let division = Division::new(3000.0, ["ana", "ben", "cy"], ["a", "b", "c"], distinct())
            .unwrap();
        let mut allocation = Allocation {
            assignment: vec![
                Placement {
                    agent: "ana",
                    good: "a",
                    price: 1100.0,
                    utility: 400.0,
                },
                Placement {
                    agent: "ben",
                    good: "b",
                    price: 1000.0,
                    utility: 400.0,
                },
                Placement {
                    agent: "cy",
                    good: "c",
                    price: 900.0,
                    utility: 400.0,
                },
            ],
            prices: [("a", 1100.0), ("b", 1000.0), ("c", 900.0)]
                .into_iter()
                .collect(),
            utilities: [("ana", 400.0), ("ben", 400.0), ("cy", 400.0)]
                .into_iter()
                .collect(),
            min_utility: 400.0,
            is_envy_free: true,
            total_budget: 3000.0,
        };

        let certificate = certify(&division, &allocation, Precision::default()).unwrap();
        assert!(certificate.is_valid());
        assert!(certificate.consistent);

        let report = swap(&division, &allocation, &"cy", &"ana").unwrap();
        assert_eq!(report.agent_a, "cy");
        assert_eq!(report.swap.a_swap_utility, -300.0);
        assert!(!report.swap.b_would_swap);

        assert_eq!(
            swap(&division, &allocation, &"cy", &"dee").unwrap_err(),
            LabelError::UnknownAgent
        );

        // Tamper with a stored price
        allocation.assignment[0].price = 1700.0;
        let certificate = certify(&division, &allocation, Precision::default()).unwrap();
        assert!(!certificate.budget_balanced);
        assert!(!certificate.consistent);
        assert_eq!(certificate.envy[0].agent, "ana");
        assert!(!certificate.is_valid());
    }

    type Stored = Allocation<&'static str, &'static str>;

    fn stored() -> (Division<&'static str, &'static str>, Stored) {
        let division = Division::new(3000.0, ["ana", "ben", "cy"], ["a", "b", "c"], distinct())
            .unwrap();
        let result = SolveResult::new(
            division.valuations(),
            Assignment::identity(3),
            PriceVector::from_units(vec![110000, 100000, 90000], Precision::default()),
            true,
            3000.0,
        );
        let allocation = division.label(&result);
        (division, allocation)
    }

    fn reprice_map(allocation: &mut Stored) {
        allocation.prices = [("a", 1100.0), ("b", 1300.0), ("c", 900.0)]
            .into_iter()
            .collect();
    }

    fn drop_price(allocation: &mut Stored) {
        allocation.prices = [("a", 1100.0), ("b", 1000.0)].into_iter().collect();
    }

    fn inflate_utility_map(allocation: &mut Stored) {
        allocation.utilities = [("ana", 400.0), ("ben", 999.0), ("cy", 400.0)]
            .into_iter()
            .collect();
    }

    fn zero_placement_utility(allocation: &mut Stored) {
        allocation.assignment[2].utility = 0.0;
    }

    fn raise_min_utility(allocation: &mut Stored) {
        allocation.min_utility = 500.0;
    }

    #[rstest]
    #[case::price_map(reprice_map)]
    #[case::missing_price(drop_price)]
    #[case::utility_map(inflate_utility_map)]
    #[case::placement_utility(zero_placement_utility)]
    #[case::min_utility(raise_min_utility)]
    fn test_inconsistent_record(#[case] tamper: fn(&mut Stored)) {
        let (division, mut allocation) = stored();
        assert!(certify(&division, &allocation, Precision::default()).unwrap().is_valid());

        tamper(&mut allocation);
        let certificate = certify(&division, &allocation, Precision::default()).unwrap();
        // The placements alone still look fine
        assert!(certificate.envy.is_empty());
        assert!(certificate.budget_balanced);
        assert!(!certificate.consistent);
        assert!(!certificate.is_valid());
    }
}
