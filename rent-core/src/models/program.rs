/// A dense linear program over free (unbounded) variables:
///
/// maximize `cᵀx` subject to a list of linear constraints, each of which is an
/// equality, an upper bound or a lower bound on `aᵀx`.
///
/// Variables are named so that the program can be exported to standard text
/// formats; non-negativity, where wanted, is expressed as an explicit
/// constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    variables: Vec<String>,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

/// The relation a constraint imposes between `aᵀx` and its bound
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    /// `aᵀx = b`
    Equal,
    /// `aᵀx ≤ b`
    AtMost,
    /// `aᵀx ≥ b`
    AtLeast,
}

/// A single named, dense linear constraint
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// The row name, used when exporting
    pub name: String,
    /// One coefficient per variable
    pub coefficients: Vec<f64>,
    /// The relation to the bound
    pub sense: Sense,
    /// The right-hand side
    pub bound: f64,
}

impl Constraint {
    /// Evaluate `aᵀx`
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(x.iter())
            .map(|(a, x)| a * x)
            .sum()
    }

    /// How far `x` is from satisfying the constraint (zero when satisfied)
    pub fn violation(&self, x: &[f64]) -> f64 {
        let activity = self.activity(x);
        match self.sense {
            Sense::Equal => (activity - self.bound).abs(),
            Sense::AtMost => (activity - self.bound).max(0.0),
            Sense::AtLeast => (self.bound - activity).max(0.0),
        }
    }
}

impl LinearProgram {
    /// Start a program over the named variables, maximizing `objective`
    ///
    /// # Panics
    ///
    /// Panics if the objective does not have one coefficient per variable.
    pub fn maximize(variables: Vec<String>, objective: Vec<f64>) -> Self {
        assert_eq!(variables.len(), objective.len());
        Self {
            variables,
            objective,
            constraints: Vec::new(),
        }
    }

    /// Append a constraint
    ///
    /// # Panics
    ///
    /// Panics if the constraint does not have one coefficient per variable.
    pub fn subject_to(
        &mut self,
        name: impl Into<String>,
        coefficients: Vec<f64>,
        sense: Sense,
        bound: f64,
    ) -> &mut Self {
        assert_eq!(coefficients.len(), self.variables.len());
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            sense,
            bound,
        });
        self
    }

    /// The variable names, in column order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The objective coefficients, in column order
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// The constraints, in row order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The objective value at `x`
    pub fn value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x.iter()).map(|(c, x)| c * x).sum()
    }

    /// The largest violation of any constraint at `x`
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|constraint| constraint.violation(x))
            .fold(0.0, f64::max)
    }
}
