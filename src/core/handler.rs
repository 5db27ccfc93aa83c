//! State handlers.
//!
//! Every non-terminal state is backed by exactly one handler. Action
//! handlers mutate the instance data; decision handlers are predicates over
//! it and select the branch to follow.

use super::kind::StateKind;
use thiserror::Error;

/// Failure reported by a client handler.
///
/// Handlers use this to enforce their own preconditions. The runtime wraps
/// it with the state that was executing and halts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

type ActionFn<D> = Box<dyn Fn(&mut D) -> Result<(), HandlerError> + Send + Sync>;
type DecisionFn<D> = Box<dyn Fn(&D) -> Result<bool, HandlerError> + Send + Sync>;

/// Behaviour bound to a state.
///
/// # Example
///
/// ```rust
/// use flowstate::core::{Handler, StateKind};
///
/// struct Counter { value: u32 }
///
/// let bump = Handler::action(|c: &mut Counter| c.value += 1);
/// let done = Handler::decision(|c: &Counter| c.value >= 3);
///
/// let mut counter = Counter { value: 0 };
/// bump.run_action(&mut counter).unwrap();
///
/// assert_eq!(bump.kind(), StateKind::Action);
/// assert_eq!(done.evaluate(&counter).unwrap(), false);
/// ```
pub enum Handler<D> {
    Action(ActionFn<D>),
    Decision(DecisionFn<D>),
}

impl<D: 'static> Handler<D> {
    /// Infallible procedure.
    pub fn action<F>(procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        Handler::Action(Box::new(move |data: &mut D| {
            procedure(data);
            Ok::<(), HandlerError>(())
        }))
    }

    /// Procedure that may reject the current instance data.
    pub fn try_action<F>(procedure: F) -> Self
    where
        F: Fn(&mut D) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Handler::Action(Box::new(procedure))
    }

    /// Infallible predicate.
    pub fn decision<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Handler::Decision(Box::new(move |data: &D| Ok::<bool, HandlerError>(predicate(data))))
    }

    /// Predicate that may reject the current instance data.
    pub fn try_decision<F>(predicate: F) -> Self
    where
        F: Fn(&D) -> Result<bool, HandlerError> + Send + Sync + 'static,
    {
        Handler::Decision(Box::new(predicate))
    }
}

impl<D> Handler<D> {
    /// The state kind this handler can back.
    pub fn kind(&self) -> StateKind {
        match self {
            Handler::Action(_) => StateKind::Action,
            Handler::Decision(_) => StateKind::Decision,
        }
    }

    /// Run an action handler. Calling this on a decision is an error.
    pub fn run_action(&self, data: &mut D) -> Result<(), HandlerError> {
        match self {
            Handler::Action(procedure) => procedure(data),
            Handler::Decision(_) => Err(HandlerError::new("decision handler invoked as an action")),
        }
    }

    /// Evaluate a decision handler. Calling this on an action is an error.
    pub fn evaluate(&self, data: &D) -> Result<bool, HandlerError> {
        match self {
            Handler::Decision(predicate) => predicate(data),
            Handler::Action(_) => Err(HandlerError::new("action handler evaluated as a decision")),
        }
    }
}

/// Name of the handler bound to a state: the state name with its first
/// character lower-cased.
///
/// ```rust
/// use flowstate::core::handler_name;
///
/// assert_eq!(handler_name("AddNextProbeToStack"), "addNextProbeToStack");
/// assert_eq!(handler_name("Init"), "init");
/// ```
pub fn handler_name(state: &str) -> String {
    let mut chars = state.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tally {
        count: usize,
    }

    #[test]
    fn action_mutates_data() {
        let handler = Handler::action(|t: &mut Tally| t.count += 2);
        let mut tally = Tally { count: 1 };

        handler.run_action(&mut tally).unwrap();

        assert_eq!(tally.count, 3);
        assert_eq!(handler.kind(), StateKind::Action);
    }

    #[test]
    fn decision_reads_data() {
        let handler = Handler::decision(|t: &Tally| t.count > 5);

        assert!(!handler.evaluate(&Tally { count: 5 }).unwrap());
        assert!(handler.evaluate(&Tally { count: 6 }).unwrap());
        assert_eq!(handler.kind(), StateKind::Decision);
    }

    #[test]
    fn fallible_handlers_surface_errors() {
        let handler = Handler::try_action(|t: &mut Tally| {
            if t.count == 0 {
                Err(HandlerError::new("tally is empty"))
            } else {
                t.count -= 1;
                Ok(())
            }
        });

        let err = handler.run_action(&mut Tally { count: 0 }).unwrap_err();
        assert_eq!(err.message(), "tally is empty");
    }

    #[test]
    fn kinds_cannot_be_crossed() {
        let action = Handler::action(|_: &mut Tally| {});
        let decision = Handler::decision(|_: &Tally| true);

        assert!(action.evaluate(&Tally { count: 0 }).is_err());
        assert!(decision.run_action(&mut Tally { count: 0 }).is_err());
    }

    #[test]
    fn handler_name_lowercases_first_character_only() {
        assert_eq!(handler_name("QueryStackEmpty"), "queryStackEmpty");
        assert_eq!(handler_name("X"), "x");
        assert_eq!(handler_name(""), "");
    }
}
