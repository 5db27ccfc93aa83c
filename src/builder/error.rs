//! Build errors for machine types.

use crate::core::StateKind;
use thiserror::Error;

/// Why a transition code could not be parsed or compiled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("branch '{branch}' must contain '->'")]
    MissingArrow { branch: String },

    #[error("branch label must be T or F, found '{label}'")]
    UnknownLabel { label: String },

    #[error("branch '{branch}' has no target")]
    MissingTarget { branch: String },

    #[error("both branches are labelled {label}, expected one T and one F")]
    RepeatedLabel { label: char },

    #[error("can only specify one or two branches, found {count}")]
    TooManyBranches { count: usize },

    #[error("last declared state has no default successor for the other branch")]
    NoSuccessor,
}

/// Errors that can occur when compiling and validating a machine type.
///
/// Any of these prevents every instance of the declaration set from running.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Machine declares no states. Call .state(name, code) before .build()")]
    NoStates,

    #[error("Invalid state name '{name}': {reason}")]
    InvalidStateName { name: String, reason: String },

    #[error("State '{name}' is declared more than once")]
    DuplicateState { name: String },

    #[error("Acronym '{acronym}' is shared by states '{first}' and '{second}'")]
    AcronymCollision {
        acronym: String,
        first: String,
        second: String,
    },

    #[error("State '{state}' has code '{code}' referencing unknown state '{token}'")]
    UnknownAcronym {
        state: String,
        code: String,
        token: String,
    },

    #[error("State '{state}' has malformed code '{code}': {reason}")]
    MalformedCode {
        state: String,
        code: String,
        #[source]
        reason: CodeError,
    },

    #[error("No handler named '{handler}' for {kind} state '{state}'")]
    MissingHandler {
        state: String,
        handler: String,
        kind: StateKind,
    },

    #[error("Terminal state '{state}' must not have a handler, found '{handler}'")]
    TerminalHandler { state: String, handler: String },

    #[error("Handler for state '{state}' is a {found} handler, not a {expected} handler")]
    HandlerKindMismatch {
        state: String,
        expected: StateKind,
        found: StateKind,
    },

    #[error("Terminal state '{state}' must end with one of {suffixes:?}")]
    TerminalNaming {
        state: String,
        suffixes: Vec<String>,
    },

    #[error("Handler '{handler}' does not match any declared state")]
    OrphanHandler { handler: String },

    #[error("States '{first}' and '{second}' both bind to handler '{handler}'")]
    HandlerNameClash {
        handler: String,
        first: String,
        second: String,
    },

    #[error("Handler '{handler}' is registered more than once")]
    DuplicateHandler { handler: String },

    #[error("Unknown start state '{state}'")]
    UnknownStartState { state: String },

    #[error("{} problems found:\n{}", .0.len(), render_all(.0))]
    Multiple(Vec<BuildError>),
}

impl BuildError {
    /// Collapse a list of problems into a single error.
    pub(crate) fn from_list(mut errors: Vec<BuildError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            BuildError::Multiple(errors)
        }
    }

    /// Every individual problem, flattening [`BuildError::Multiple`].
    pub fn problems(&self) -> Vec<&BuildError> {
        match self {
            BuildError::Multiple(errors) => errors.iter().flat_map(|e| e.problems()).collect(),
            other => vec![other],
        }
    }
}

fn render_all(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
