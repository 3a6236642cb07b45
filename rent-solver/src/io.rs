use rent_core::models::{Allocation, Division, LabelError, Map, ValuationMatrix};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_wrapper {
    ($struct:ident) => {
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        #[doc = concat!("A newtype wrapper for ", stringify!($struct))]
        pub struct $struct(String);

        impl fmt::Display for $struct {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

string_wrapper!(AgentId);
string_wrapper!(GoodId);

/// A division with string ids
pub type LabelledDivision = Division<AgentId, GoodId>;

/// An allocation with string ids, as read from and written to disk
pub type LabelledAllocation = Allocation<AgentId, GoodId>;

/// How agents' valuations are supplied
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Preferences {
    /// A dense matrix, rows parallel to `agents` and columns to `goods`
    Valuations {
        /// the rows
        valuations: Vec<Vec<f64>>,
    },
    /// Per-agent bids by good; a missing bid is a valuation of zero
    Bids {
        /// the bids
        bids: Map<AgentId, Map<GoodId, f64>>,
    },
}

/// A representation of a division problem, intended for use with serde
#[derive(Debug, Serialize, Deserialize)]
pub struct DivisionDocument {
    /// the total to divide
    pub budget: f64,
    /// the agents, in row order
    pub agents: Vec<AgentId>,
    /// the goods, in column order
    pub goods: Vec<GoodId>,
    /// the valuations
    #[serde(flatten)]
    pub preferences: Preferences,
}

impl DivisionDocument {
    /// Validate the document into a division
    pub fn prepare(self) -> Result<LabelledDivision, LabelError> {
        let Self {
            budget,
            agents,
            goods,
            preferences,
        } = self;

        match preferences {
            Preferences::Valuations { valuations } => {
                Division::new(budget, agents, goods, ValuationMatrix::new(valuations)?)
            }
            Preferences::Bids { bids } => Division::from_bids(
                budget,
                agents,
                goods,
                bids.into_iter().map(|(agent, row)| (agent, row.into_iter())),
            ),
        }
    }
}
