//! State roles.
//!
//! A state's kind is never declared. It follows from how many transitions
//! its code compiles to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a state within a machine.
///
/// # Example
///
/// ```rust
/// use flowstate::core::StateKind;
///
/// assert_eq!(StateKind::from_arity(0), Some(StateKind::Terminal));
/// assert_eq!(StateKind::from_arity(1), Some(StateKind::Action));
/// assert_eq!(StateKind::from_arity(2), Some(StateKind::Decision));
/// assert_eq!(StateKind::from_arity(3), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// One unconditional transition, backed by a procedure.
    Action,
    /// Two transitions chosen by a boolean predicate.
    Decision,
    /// No outgoing transitions. A run halts here.
    Terminal,
}

impl StateKind {
    /// Kind implied by a transition count, if the count is legal.
    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            0 => Some(Self::Terminal),
            1 => Some(Self::Action),
            2 => Some(Self::Decision),
            _ => None,
        }
    }

    /// Number of outgoing transitions a state of this kind has.
    pub fn arity(self) -> usize {
        match self {
            Self::Terminal => 0,
            Self::Action => 1,
            Self::Decision => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Action => "action",
            Self::Decision => "decision",
            Self::Terminal => "terminal",
        };
        f.write_str(label)
    }
}
