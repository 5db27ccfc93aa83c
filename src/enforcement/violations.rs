//! Visit-count violations.

use thiserror::Error;

/// A visit rule that did not hold.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VisitViolation {
    #[error("Visited state {state} {visits} times, more than the allowed {max}")]
    TooManyVisits {
        state: String,
        max: usize,
        visits: usize,
    },

    #[error("Visited state {state} {visits} times, but expected {expected}")]
    WrongVisitCount {
        state: String,
        expected: usize,
        visits: usize,
    },
}

impl VisitViolation {
    /// Name of the state the rule was attached to.
    pub fn state(&self) -> &str {
        match self {
            Self::TooManyVisits { state, .. } | Self::WrongVisitCount { state, .. } => state,
        }
    }
}
