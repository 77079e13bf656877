use super::defs::Discrete;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter shape: expected {expected:?}, found {found:?}")]
    InvalidParameterShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Policy parameters were not supplied; pass a [n_a, n_s] matrix explicitly")]
    MissingParameters,

    #[error("Invalid distribution for action {action}, state {state}: {reason}")]
    InvalidDistribution {
        action: Discrete,
        state: Discrete,
        reason: String,
    },

    #[error("Invalid policy for state {state}: {reason}")]
    InvalidPolicy { state: Discrete, reason: String },

    #[error("{kind} index {index} is out of range (must be < {bound})")]
    OutOfRangeIndex {
        kind: IndexKind,
        index: Discrete,
        bound: Discrete,
    },

    #[error("Invalid MDP: {0}")]
    InvalidMdp(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    State,
    Action,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::State => write!(f, "State"),
            IndexKind::Action => write!(f, "Action"),
        }
    }
}

/// Fails with [`Error::OutOfRangeIndex`] unless `index < bound`.
pub fn check_index(kind: IndexKind, index: Discrete, bound: Discrete) -> Result<()> {
    if index < bound {
        Ok(())
    } else {
        Err(Error::OutOfRangeIndex { kind, index, bound })
    }
}
