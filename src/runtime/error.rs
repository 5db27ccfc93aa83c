//! Runtime errors for machine instances.

use crate::builder::BuildError;
use crate::core::HandlerError;
use crate::enforcement::VisitViolation;
use thiserror::Error;

/// Errors raised while driving a machine instance.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    #[error("Machine {machine} is in terminal state {state} and cannot step")]
    TerminalStep { machine: String, state: String },

    #[error("Machine {machine} has no state named '{state}'")]
    UnknownState { machine: String, state: String },

    #[error("Halted in terminal state {halted} before reaching {target}")]
    TargetUnreachable { target: String, halted: String },

    #[error("Requested step count {requested} but already at step {current}")]
    StepCountPassed { requested: usize, current: usize },

    #[error("Reached terminal state {halted} before passing {expected}")]
    UnexpectedTerminal { expected: String, halted: String },

    #[error("Expected to be in state {expected}, but current state is {actual}")]
    UnexpectedState { expected: String, actual: String },

    #[error("Handler for state {state} failed: {source}")]
    HandlerFailed {
        state: String,
        #[source]
        source: HandlerError,
    },

    #[error("Replay diverged at step {step}: expected {expected}, got {actual}")]
    ReplayDiverged {
        step: usize,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    VisitLimitExceeded(VisitViolation),

    #[error("Visit counts did not match: {}", render_violations(.0))]
    VisitCountMismatch(Vec<VisitViolation>),

    #[error("Instance of {machine} is in state {state}; only terminal instances can be parked")]
    NotParked { machine: String, state: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}

fn render_violations(violations: &[VisitViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn handler_failure_keeps_source() {
        let err = RuntimeError::HandlerFailed {
            state: "PollQueryStack".to_string(),
            source: HandlerError::new("stack is empty"),
        };

        assert!(err.to_string().contains("PollQueryStack"));
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("stack is empty".to_string())
        );
    }

    #[test]
    fn visit_mismatch_lists_every_violation() {
        let err = RuntimeError::VisitCountMismatch(vec![
            VisitViolation::WrongVisitCount {
                state: "Check".to_string(),
                expected: 3,
                visits: 2,
            },
            VisitViolation::WrongVisitCount {
                state: "Init".to_string(),
                expected: 1,
                visits: 3,
            },
        ]);

        let message = err.to_string();
        assert!(message.contains("Check"));
        assert!(message.contains("Init"));
    }

    #[test]
    fn build_errors_convert() {
        let err: RuntimeError = BuildError::NoStates.into();
        assert!(matches!(err, RuntimeError::Build(BuildError::NoStates)));
    }
}
