use clarabel::{algebra::*, solver::*};
use rent_core::{
    models::{LinearProgram, Sense},
    ports::{LinearSolver, PricingError},
};
use tracing::{Level, event};

/// A [`LinearSolver`] backed by the Clarabel interior point solver
pub struct ClarabelSolver(DefaultSettings<f64>);

impl Default for ClarabelSolver {
    fn default() -> Self {
        let mut settings = DefaultSettings::default();
        settings.verbose = false;
        Self(settings)
    }
}

impl LinearSolver for ClarabelSolver {
    type Settings = DefaultSettings<f64>;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn maximize(&self, program: &LinearProgram) -> Result<Vec<f64>, PricingError> {
        let n = program.variables().len();

        // Clarabel minimizes, so we negate the objective
        let q = program.objective().iter().map(|c| -c).collect::<Vec<_>>();

        // Constraints take the form Ax + s = b with s in a cone. The equalities
        // come first (s in the zero cone), then the inequalities rewritten as
        // aᵀx ≤ b (s in the nonnegative cone).
        let equalities = program
            .constraints()
            .iter()
            .filter(|constraint| constraint.sense == Sense::Equal);
        let inequalities = program
            .constraints()
            .iter()
            .filter(|constraint| constraint.sense != Sense::Equal);
        let nzero = equalities.clone().count();

        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut vals = Vec::new();
        let mut b = Vec::new();

        for constraint in equalities.chain(inequalities) {
            // The signs on lower bounds flip because the cone is s ≥ 0
            let sign = match constraint.sense {
                Sense::Equal | Sense::AtMost => 1.0,
                Sense::AtLeast => -1.0,
            };
            for (col, &value) in constraint.coefficients.iter().enumerate() {
                if value != 0.0 {
                    rows.push(b.len());
                    cols.push(col);
                    vals.push(sign * value);
                }
            }
            b.push(sign * constraint.bound);
        }

        let m = b.len();
        let a_matrix = CscMatrix::new_from_triplets(m, n, rows, cols, vals);
        let p_matrix = CscMatrix::<f64>::zeros((n, n));

        let mut cones = Vec::new();
        if nzero > 0 {
            cones.push(ZeroConeT(nzero));
        }
        if m > nzero {
            cones.push(NonnegativeConeT(m - nzero));
        }

        let mut solver =
            DefaultSolver::new(&p_matrix, &q, &a_matrix, &b, &cones, self.0.clone())
                .map_err(|error| PricingError::Failed(error.to_string()))?;
        solver.solve();

        let status = solver.solution.status;
        event!(
            Level::DEBUG,
            %status,
            iterations = solver.solution.iterations,
            "clarabel finished"
        );

        match status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => Ok(solver.solution.x),
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                Err(PricingError::Infeasible)
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                Err(PricingError::Unbounded)
            }
            other => Err(PricingError::Failed(other.to_string())),
        }
    }
}
