use rent_core::{
    models::{Assignment, Budget, LinearProgram, Sense, ValuationMatrix},
    ports::{LinearSolver, PricingError},
};
use tracing::{Level, event};

/// Unrounded prices and the maximin slack returned by the pricing program
#[derive(Clone, Debug, PartialEq)]
pub struct RawPrices {
    /// One price per good, indexed by good
    pub prices: Vec<f64>,
    /// The optimal lower bound on every agent's utility
    pub slack: f64,
}

/// Build the envy-free maximin program for a fixed assignment.
///
/// Variables are `p0..p{n-1}` (one price per good) followed by `s`, the slack.
/// Rows, in order:
///
/// - `budget`: `Σ p = budget`
/// - `ef_{i}_{j}` for each agent `i` and good `j` other than its own:
///   `p_j − p_{a(i)} ≥ v_ij − v_{i,a(i)}`
/// - `maximin_{i}` for each agent: `p_{a(i)} + s ≤ v_{i,a(i)}`
/// - `nonneg_{j}` for each good: `p_j ≥ 0`
/// - `slack_floor`: `s ≥ 0`
///
/// The slack floor makes the program infeasible whenever some agent would have
/// to pay more than its valuation, in particular when the budget exceeds the
/// welfare of the assignment.
pub fn envy_free_program(
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    budget: f64,
) -> LinearProgram {
    let n = valuations.size();
    let slack = n;

    let variables = (0..n)
        .map(|good| format!("p{good}"))
        .chain(std::iter::once("s".to_owned()))
        .collect::<Vec<_>>();
    let mut objective = vec![0.0; n + 1];
    objective[slack] = 1.0;

    let mut program = LinearProgram::maximize(variables, objective);

    let mut row = vec![1.0; n + 1];
    row[slack] = 0.0;
    program.subject_to("budget", row, Sense::Equal, budget);

    for (agent, own) in assignment.iter() {
        let base = valuations.get(agent, own);
        for good in (0..n).filter(|&good| good != own) {
            let mut row = vec![0.0; n + 1];
            row[good] = 1.0;
            row[own] = -1.0;
            program.subject_to(
                format!("ef_{agent}_{good}"),
                row,
                Sense::AtLeast,
                valuations.get(agent, good) - base,
            );
        }
    }

    for (agent, own) in assignment.iter() {
        let mut row = vec![0.0; n + 1];
        row[own] = 1.0;
        row[slack] = 1.0;
        program.subject_to(
            format!("maximin_{agent}"),
            row,
            Sense::AtMost,
            valuations.get(agent, own),
        );
    }

    for good in 0..n {
        let mut row = vec![0.0; n + 1];
        row[good] = 1.0;
        program.subject_to(format!("nonneg_{good}"), row, Sense::AtLeast, 0.0);
    }

    let mut row = vec![0.0; n + 1];
    row[slack] = 1.0;
    program.subject_to("slack_floor", row, Sense::AtLeast, 0.0);

    program
}

/// Solve for envy-free maximin prices under a fixed assignment.
///
/// The backend's answer is not taken on trust: a point that is not finite, or
/// that violates any constraint by more than a small multiple of the problem's
/// scale, is reported as [`PricingError::Failed`].
pub fn price<S: LinearSolver>(
    solver: &S,
    valuations: &ValuationMatrix,
    assignment: &Assignment,
    budget: &Budget,
) -> Result<RawPrices, PricingError> {
    let n = valuations.size();
    let program = envy_free_program(valuations, assignment, budget.amount());

    event!(
        Level::DEBUG,
        variables = program.variables().len(),
        constraints = program.constraints().len(),
        "solving pricing program"
    );

    let solution = solver.maximize(&program)?;

    if solution.len() != n + 1 {
        return Err(PricingError::Failed(format!(
            "expected {} values, received {}",
            n + 1,
            solution.len()
        )));
    }
    if solution.iter().any(|x| !x.is_finite()) {
        return Err(PricingError::Failed("non-finite solution".to_owned()));
    }

    let scale = budget.amount().max(valuations.max_value()).max(1.0);
    let violation = program.max_violation(&solution);
    if violation > 1e-7 * scale {
        return Err(PricingError::Failed(format!(
            "solution violates the program by {violation}"
        )));
    }

    let slack = solution[n];
    let mut prices = solution;
    prices.truncate(n);

    event!(Level::DEBUG, ?prices, slack, "solved pricing program");

    Ok(RawPrices { prices, slack })
}
