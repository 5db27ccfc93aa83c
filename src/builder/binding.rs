//! Handler binding resolver.
//!
//! Binds each declared state to the handler registered under its
//! conventional name and checks that the handler agrees with the state's
//! compiled kind. Uses `Validation` to report ALL binding problems in one
//! pass instead of stopping at the first.

use crate::builder::BuildError;
use crate::config::EngineConfig;
use crate::core::{handler_name, Handler, StateDescriptor, StateKind, TransitionTable};
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<BuildError>>;

fn require(ok: bool, error: impl FnOnce() -> BuildError) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error())
    }
}

/// Collapse accumulated checks into a `Result`.
pub(crate) fn conclude(checks: Vec<Check>) -> Result<(), BuildError> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => {
            Err(BuildError::from_list(errors.iter().cloned().collect()))
        }
    }
}

/// Resolve the dispatch table: one slot per state, `None` for terminals.
pub(crate) fn bind_handlers<D>(
    states: &[StateDescriptor],
    table: &TransitionTable,
    registered: Vec<(String, Handler<D>)>,
    config: &EngineConfig,
) -> Result<Vec<Option<Handler<D>>>, BuildError> {
    let mut checks: Vec<Check> = Vec::new();
    let mut pending: BTreeMap<String, Handler<D>> = BTreeMap::new();

    for (name, handler) in registered {
        let duplicate = pending.contains_key(&name);
        checks.push(require(!duplicate, || BuildError::DuplicateHandler {
            handler: name.clone(),
        }));
        if !duplicate {
            pending.insert(name, handler);
        }
    }

    let mut bound = Vec::with_capacity(states.len());
    let mut claimed: BTreeMap<String, &str> = BTreeMap::new();

    for (state, (_, transitions)) in states.iter().zip(table.iter()) {
        let expected = transitions.kind();
        let name = handler_name(&state.name);

        if let Some(first) = claimed.get(&name) {
            checks.push(Validation::fail(BuildError::HandlerNameClash {
                handler: name,
                first: first.to_string(),
                second: state.name.clone(),
            }));
            bound.push(None);
            continue;
        }
        claimed.insert(name.clone(), &state.name);
        let handler = pending.remove(&name);

        match expected {
            StateKind::Terminal => {
                checks.push(require(handler.is_none(), || BuildError::TerminalHandler {
                    state: state.name.clone(),
                    handler: name.clone(),
                }));
                checks.push(require(config.is_terminal_name(&state.name), || {
                    BuildError::TerminalNaming {
                        state: state.name.clone(),
                        suffixes: config.terminal_suffixes.clone(),
                    }
                }));
                bound.push(None);
            }
            StateKind::Action | StateKind::Decision => match handler {
                None => {
                    checks.push(Validation::fail(BuildError::MissingHandler {
                        state: state.name.clone(),
                        handler: name,
                        kind: expected,
                    }));
                    bound.push(None);
                }
                Some(handler) => {
                    let found = handler.kind();
                    checks.push(require(found == expected, || BuildError::HandlerKindMismatch {
                        state: state.name.clone(),
                        expected,
                        found,
                    }));
                    bound.push(Some(handler));
                }
            },
        }
    }

    for orphan in pending.into_keys() {
        checks.push(Validation::fail(BuildError::OrphanHandler { handler: orphan }));
    }

    conclude(checks)?;
    Ok(bound)
}
