//! Compiled transition table.

use super::kind::StateKind;
use std::fmt;

/// Position of a state in its machine's declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Declaration index of the state.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared state: its name, position and raw transition code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDescriptor {
    pub name: String,
    pub index: usize,
    pub code: String,
}

/// Outgoing transitions of one state.
///
/// The variant is the state's kind; the arity invariant cannot be broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transitions {
    Terminal,
    Action(StateId),
    Decision { on_true: StateId, on_false: StateId },
}

impl Transitions {
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Terminal => StateKind::Terminal,
            Self::Action(_) => StateKind::Action,
            Self::Decision { .. } => StateKind::Decision,
        }
    }

    /// Targets as an ordered list: `[]`, `[next]` or `[on_true, on_false]`.
    pub fn targets(&self) -> Vec<StateId> {
        match *self {
            Self::Terminal => Vec::new(),
            Self::Action(next) => vec![next],
            Self::Decision { on_true, on_false } => vec![on_true, on_false],
        }
    }

    pub fn len(&self) -> usize {
        self.kind().arity()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Terminal)
    }

    /// Successor for a predicate outcome. Action states ignore `outcome`.
    pub fn next(&self, outcome: bool) -> Option<StateId> {
        match *self {
            Self::Terminal => None,
            Self::Action(next) => Some(next),
            Self::Decision { on_true, on_false } => Some(if outcome { on_true } else { on_false }),
        }
    }
}

/// Transitions for every state of a machine, indexed by [`StateId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionTable {
    rows: Vec<Transitions>,
}

impl TransitionTable {
    pub(crate) fn new(rows: Vec<Transitions>) -> Self {
        Self { rows }
    }

    pub fn get(&self, id: StateId) -> Option<&Transitions> {
        self.rows.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &Transitions)> {
        self.rows.iter().enumerate().map(|(i, t)| (StateId(i), t))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_ordered_true_then_false() {
        let t = Transitions::Decision {
            on_true: StateId(4),
            on_false: StateId(1),
        };
        assert_eq!(t.targets(), vec![StateId(4), StateId(1)]);
        assert_eq!(t.next(true), Some(StateId(4)));
        assert_eq!(t.next(false), Some(StateId(1)));
    }

    #[test]
    fn length_matches_kind() {
        let rows = [
            Transitions::Terminal,
            Transitions::Action(StateId(0)),
            Transitions::Decision {
                on_true: StateId(0),
                on_false: StateId(1),
            },
        ];
        for row in rows {
            assert_eq!(row.len(), row.targets().len());
            assert_eq!(StateKind::from_arity(row.len()), Some(row.kind()));
        }
    }

    #[test]
    fn action_ignores_outcome() {
        let t = Transitions::Action(StateId(2));
        assert_eq!(t.next(true), t.next(false));
        assert_eq!(Transitions::Terminal.next(true), None);
    }
}
