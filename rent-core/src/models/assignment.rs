/// A bijection from agents to goods: entry `i` is the good assigned to agent `i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct Assignment(Vec<usize>);

impl Assignment {
    /// Creates an assignment from the good of each agent, validating that it is a permutation
    pub fn new(goods: Vec<usize>) -> Result<Self, AssignmentError> {
        Self::try_from(goods)
    }

    /// Creates an assignment without checking that it is a permutation.
    ///
    /// # Safety
    ///
    /// Every entry must be less than `goods.len()` and no entry may repeat.
    /// Violating this does not cause memory unsafety directly, but downstream
    /// consumers index price and valuation vectors with these entries and
    /// assume a bijection.
    pub unsafe fn new_unchecked(goods: Vec<usize>) -> Self {
        Self(goods)
    }

    /// Agent `i` receives good `i`
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// The number of agents (and goods)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the assignment is over zero agents
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The good assigned to `agent`
    pub fn good_of(&self, agent: usize) -> usize {
        self.0[agent]
    }

    /// The agent holding `good`, if the good is in range
    pub fn agent_of(&self, good: usize) -> Option<usize> {
        self.0.iter().position(|&g| g == good)
    }

    /// Iterate over `(agent, good)` pairs in agent order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// The underlying good-per-agent vector
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl TryFrom<Vec<usize>> for Assignment {
    type Error = AssignmentError;

    fn try_from(goods: Vec<usize>) -> Result<Self, Self::Error> {
        let n = goods.len();
        let mut taken = vec![false; n];
        for (agent, &good) in goods.iter().enumerate() {
            if good >= n {
                return Err(AssignmentError::OutOfRange { agent, good });
            }
            if std::mem::replace(&mut taken[good], true) {
                return Err(AssignmentError::Duplicate { good });
            }
        }
        Ok(Self(goods))
    }
}

impl From<Assignment> for Vec<usize> {
    fn from(value: Assignment) -> Self {
        value.0
    }
}

/// Errors raised when a vector of goods is not a permutation
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum AssignmentError {
    /// An agent was given a good that does not exist
    #[error("agent {agent} is assigned good {good}, which is out of range")]
    OutOfRange {
        /// The agent
        agent: usize,
        /// The good
        good: usize,
    },
    /// A good was given to more than one agent
    #[error("good {good} is assigned to more than one agent")]
    Duplicate {
        /// The good
        good: usize,
    },
    /// The assignment does not cover the same number of agents as the valuations
    #[error("assignment covers {len} agents, expected {expected}")]
    SizeMismatch {
        /// Agents in the assignment
        len: usize,
        /// Agents in the valuation matrix
        expected: usize,
    },
}
