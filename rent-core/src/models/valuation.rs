use crate::models::Assignment;

/// A square matrix of valuations: row `i`, column `j` is agent `i`'s maximum
/// willingness to pay for good `j`.
///
/// A valid matrix is non-empty, square, and every entry is finite and
/// non-negative. The matrix is immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ValuationMatrixDto", into = "ValuationMatrixDto")
)]
pub struct ValuationMatrix(Vec<Vec<f64>>);

impl ValuationMatrix {
    /// Creates a new valuation matrix from its rows, validating shape and entries
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ValuationError> {
        Self::try_from(ValuationMatrixDto(rows))
    }

    /// The number of agents (equivalently, the number of goods)
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Agent `agent`'s valuation of good `good`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, agent: usize, good: usize) -> f64 {
        self.0[agent][good]
    }

    /// The valuations of a single agent, indexed by good
    pub fn row(&self, agent: usize) -> &[f64] {
        &self.0[agent]
    }

    /// Iterate over the rows of the matrix, in agent order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// The largest entry of the matrix
    pub fn max_value(&self) -> f64 {
        self.rows()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max)
    }

    /// Each agent's valuation of the good they are assigned, in agent order
    pub fn assigned(&self, assignment: &Assignment) -> Vec<f64> {
        assignment
            .iter()
            .map(|(agent, good)| self.get(agent, good))
            .collect()
    }

    /// Total valuation (social welfare) of an assignment.
    ///
    /// The sum is accumulated in agent order, so identical inputs always
    /// produce bit-identical welfare values.
    pub fn welfare(&self, assignment: &Assignment) -> f64 {
        assignment
            .iter()
            .fold(0.0, |total, (agent, good)| total + self.get(agent, good))
    }
}

/// A DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Debug)]
pub struct ValuationMatrixDto(pub Vec<Vec<f64>>);

impl From<ValuationMatrix> for ValuationMatrixDto {
    fn from(value: ValuationMatrix) -> Self {
        Self(value.0)
    }
}

impl TryFrom<ValuationMatrixDto> for ValuationMatrix {
    type Error = ValuationError;

    fn try_from(value: ValuationMatrixDto) -> Result<Self, Self::Error> {
        let rows = value.0;
        let n = rows.len();
        if n == 0 {
            return Err(ValuationError::Empty);
        }

        for (agent, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(ValuationError::NotSquare {
                    agent,
                    len: row.len(),
                    expected: n,
                });
            }
            for (good, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ValuationError::NotFinite { agent, good });
                }
                if value < 0.0 {
                    return Err(ValuationError::Negative { agent, good });
                }
            }
        }

        Ok(Self(rows))
    }
}

/// Errors that can occur when creating or validating a ValuationMatrix
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValuationError {
    /// There are no agents
    #[error("valuation matrix is empty")]
    Empty,
    /// A row does not have one entry per agent
    #[error("row for agent {agent} has {len} entries, expected {expected}")]
    NotSquare {
        /// The offending row
        agent: usize,
        /// Its length
        len: usize,
        /// The number of rows
        expected: usize,
    },
    /// An entry is negative
    #[error("agent {agent} has a negative valuation for good {good}")]
    Negative {
        /// The agent
        agent: usize,
        /// The good
        good: usize,
    },
    /// An entry is NaN or infinite
    #[error("agent {agent} has a non-finite valuation for good {good}")]
    NotFinite {
        /// The agent
        agent: usize,
        /// The good
        good: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        let matrix = ValuationMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(matrix.size(), 2);
        assert_eq!(matrix.get(1, 0), 3.0);
        assert_eq!(matrix.row(0), &[1.0, 2.0]);
        assert_eq!(matrix.max_value(), 4.0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            ValuationMatrix::new(vec![]).unwrap_err(),
            ValuationError::Empty
        );
    }

    #[test]
    fn test_ragged() {
        assert_eq!(
            ValuationMatrix::new(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err(),
            ValuationError::NotSquare {
                agent: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_negative() {
        assert_eq!(
            ValuationMatrix::new(vec![vec![1.0, 2.0], vec![3.0, -0.5]]).unwrap_err(),
            ValuationError::Negative { agent: 1, good: 1 }
        );
    }

    #[test]
    fn test_nans() {
        assert_eq!(
            ValuationMatrix::new(vec![vec![f64::NAN]]).unwrap_err(),
            ValuationError::NotFinite { agent: 0, good: 0 }
        );
        assert_eq!(
            ValuationMatrix::new(vec![vec![0.0, f64::INFINITY], vec![0.0, 0.0]]).unwrap_err(),
            ValuationError::NotFinite { agent: 0, good: 1 }
        );
    }

    #[test]
    fn test_welfare() {
        let matrix = ValuationMatrix::new(vec![vec![5.0, 1.0], vec![2.0, 7.0]]).unwrap();
        let identity = Assignment::identity(2);
        let swapped = Assignment::new(vec![1, 0]).unwrap();
        assert_eq!(matrix.welfare(&identity), 12.0);
        assert_eq!(matrix.welfare(&swapped), 3.0);
        assert_eq!(matrix.assigned(&swapped), vec![1.0, 2.0]);
    }

    #[test]
    fn test_deserialize_validates() {
        let result = serde_json::from_str::<ValuationMatrix>("[[1.0, 2.0], [3.0]]");
        assert!(result.is_err());

        let matrix = serde_json::from_str::<ValuationMatrix>("[[1.0, 2.0], [3.0, 4.0]]").unwrap();
        assert_eq!(matrix.size(), 2);
    }
}
