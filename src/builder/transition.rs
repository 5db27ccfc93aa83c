//! Transition code compiler.
//!
//! A transition code is the short string attached to each declared state:
//!
//! | code            | meaning                                              |
//! |-----------------|------------------------------------------------------|
//! | `"0"`           | terminal                                             |
//! | `""`            | go to the next declared state (terminal if last)     |
//! | `"NQIC"`        | go to the state with that acronym (or full name)     |
//! | `"F->AQTS"`     | decision: false goes to AQTS, true to the next state |
//! | `"T->X, F->Y"`  | decision with both branches explicit, either order   |
//!
//! Compiled decisions are always ordered `[true-target, false-target]`.

use crate::builder::{BuildError, CodeError};
use crate::core::{AcronymIndex, StateId, Transitions};

const ARROW: &str = "->";

/// Parsed form of a transition code, before names are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionCode<'a> {
    /// Explicit terminal, `"0"`.
    End,
    /// Empty code: follow declaration order.
    Default,
    /// Single unconditional target.
    Goto(&'a str),
    /// One explicit branch; the other follows declaration order.
    Branch { outcome: bool, target: &'a str },
    /// Both branches explicit.
    Both { on_true: &'a str, on_false: &'a str },
}

impl<'a> TransitionCode<'a> {
    /// Parse a raw code.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowstate::builder::{CodeError, TransitionCode};
    ///
    /// assert_eq!(TransitionCode::parse(" 0 "), Ok(TransitionCode::End));
    /// assert_eq!(
    ///     TransitionCode::parse("F->Y, T->X"),
    ///     Ok(TransitionCode::Both { on_true: "X", on_false: "Y" })
    /// );
    /// assert_eq!(
    ///     TransitionCode::parse("T->X,T->Y"),
    ///     Err(CodeError::RepeatedLabel { label: 'T' })
    /// );
    /// ```
    pub fn parse(code: &'a str) -> Result<Self, CodeError> {
        let code = code.trim();

        if code == "0" {
            return Ok(Self::End);
        }
        if code.is_empty() {
            return Ok(Self::Default);
        }
        if !code.contains(ARROW) {
            return Ok(Self::Goto(code));
        }

        let branches: Vec<&str> = code.split(',').collect();
        match *branches.as_slice() {
            [single] => {
                let (outcome, target) = parse_branch(single)?;
                Ok(Self::Branch { outcome, target })
            }
            [first, second] => {
                let (first_outcome, first_target) = parse_branch(first)?;
                let (second_outcome, second_target) = parse_branch(second)?;
                if first_outcome == second_outcome {
                    let label = if first_outcome { 'T' } else { 'F' };
                    return Err(CodeError::RepeatedLabel { label });
                }
                if first_outcome {
                    Ok(Self::Both {
                        on_true: first_target,
                        on_false: second_target,
                    })
                } else {
                    Ok(Self::Both {
                        on_true: second_target,
                        on_false: first_target,
                    })
                }
            }
            _ => Err(CodeError::TooManyBranches {
                count: branches.len(),
            }),
        }
    }
}

fn parse_branch(branch: &str) -> Result<(bool, &str), CodeError> {
    let Some((label, target)) = branch.split_once(ARROW) else {
        return Err(CodeError::MissingArrow {
            branch: branch.trim().to_string(),
        });
    };

    let outcome = match label.trim() {
        "T" => true,
        "F" => false,
        other => {
            return Err(CodeError::UnknownLabel {
                label: other.to_string(),
            })
        }
    };

    let target = target.trim();
    if target.is_empty() {
        return Err(CodeError::MissingTarget {
            branch: branch.trim().to_string(),
        });
    }

    Ok((outcome, target))
}

/// Compile the code of the state at `position` out of `state_count`
/// declared states.
pub fn compile_code(
    state: &str,
    code: &str,
    position: usize,
    state_count: usize,
    index: &AcronymIndex,
) -> Result<Transitions, BuildError> {
    let malformed = |reason: CodeError| BuildError::MalformedCode {
        state: state.to_string(),
        code: code.to_string(),
        reason,
    };
    let resolve = |token: &str| {
        index
            .resolve(token)
            .map(StateId)
            .ok_or_else(|| BuildError::UnknownAcronym {
                state: state.to_string(),
                code: code.to_string(),
                token: token.to_string(),
            })
    };
    let successor = (position + 1 < state_count).then_some(StateId(position + 1));

    match TransitionCode::parse(code).map_err(malformed)? {
        TransitionCode::End => Ok(Transitions::Terminal),
        TransitionCode::Default => Ok(successor.map_or(Transitions::Terminal, Transitions::Action)),
        TransitionCode::Goto(target) => Ok(Transitions::Action(resolve(target)?)),
        TransitionCode::Branch { outcome, target } => {
            let explicit = resolve(target)?;
            let fallback = successor.ok_or_else(|| malformed(CodeError::NoSuccessor))?;
            Ok(if outcome {
                Transitions::Decision {
                    on_true: explicit,
                    on_false: fallback,
                }
            } else {
                Transitions::Decision {
                    on_true: fallback,
                    on_false: explicit,
                }
            })
        }
        TransitionCode::Both { on_true, on_false } => Ok(Transitions::Decision {
            on_true: resolve(on_true)?,
            on_false: resolve(on_false)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 4] = ["Init", "Check", "Retry", "Done"];

    fn compile(position: usize, code: &str) -> Result<Transitions, BuildError> {
        let index = AcronymIndex::build(NAMES).unwrap();
        compile_code(NAMES[position], code, position, NAMES.len(), &index)
    }

    #[test]
    fn zero_is_terminal_anywhere() {
        assert_eq!(compile(0, "0").unwrap(), Transitions::Terminal);
        assert_eq!(compile(2, " 0 ").unwrap(), Transitions::Terminal);
    }

    #[test]
    fn empty_code_follows_declaration_order() {
        assert_eq!(compile(0, "").unwrap(), Transitions::Action(StateId(1)));
        assert_eq!(compile(2, "   ").unwrap(), Transitions::Action(StateId(3)));
    }

    #[test]
    fn empty_code_on_last_state_is_terminal() {
        assert_eq!(compile(3, "").unwrap(), Transitions::Terminal);
    }

    #[test]
    fn bare_token_is_a_goto() {
        assert_eq!(compile(2, "C").unwrap(), Transitions::Action(StateId(1)));
        assert_eq!(compile(2, "Check").unwrap(), Transitions::Action(StateId(1)));
    }

    #[test]
    fn false_branch_defaults_true_to_successor() {
        assert_eq!(
            compile(1, "F->I").unwrap(),
            Transitions::Decision {
                on_true: StateId(2),
                on_false: StateId(0),
            }
        );
    }

    #[test]
    fn true_branch_defaults_false_to_successor() {
        assert_eq!(
            compile(1, "T -> D").unwrap(),
            Transitions::Decision {
                on_true: StateId(3),
                on_false: StateId(2),
            }
        );
    }

    #[test]
    fn both_branches_in_either_order() {
        let forward = compile(1, "T->D,F->I").unwrap();
        let reversed = compile(1, " F->I , T->D ").unwrap();

        assert_eq!(forward, reversed);
        assert_eq!(forward.targets(), vec![StateId(3), StateId(0)]);
    }

    #[test]
    fn unknown_token_names_state_and_code() {
        match compile(1, "F->XQ") {
            Err(BuildError::UnknownAcronym { state, code, token }) => {
                assert_eq!(state, "Check");
                assert_eq!(code, "F->XQ");
                assert_eq!(token, "XQ");
            }
            other => panic!("expected unknown acronym, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_branch_label_is_malformed() {
        assert!(matches!(
            compile(1, "T->I,T->D"),
            Err(BuildError::MalformedCode { .. })
        ));
        assert!(matches!(
            compile(1, "F->I,F->D"),
            Err(BuildError::MalformedCode { .. })
        ));
    }

    #[test]
    fn three_branches_are_malformed() {
        assert!(matches!(
            compile(1, "T->I,F->D,T->R"),
            Err(BuildError::MalformedCode { .. })
        ));
    }

    #[test]
    fn bad_label_is_malformed() {
        assert!(matches!(
            compile(1, "Y->I"),
            Err(BuildError::MalformedCode { .. })
        ));
        assert!(matches!(
            compile(1, "T->I,D"),
            Err(BuildError::MalformedCode { .. })
        ));
        assert!(matches!(
            compile(1, "T->"),
            Err(BuildError::MalformedCode { .. })
        ));
    }

    #[test]
    fn single_branch_on_last_state_is_malformed() {
        assert!(matches!(
            compile(3, "F->I"),
            Err(BuildError::MalformedCode {
                reason: CodeError::NoSuccessor,
                ..
            })
        ));
    }

    #[test]
    fn parse_errors_name_the_problem() {
        assert_eq!(
            TransitionCode::parse("X->I"),
            Err(CodeError::UnknownLabel {
                label: "X".to_string()
            })
        );
        assert_eq!(
            TransitionCode::parse("T->I, F"),
            Err(CodeError::MissingArrow {
                branch: "F".to_string()
            })
        );
        assert_eq!(
            TransitionCode::parse("F-> "),
            Err(CodeError::MissingTarget {
                branch: "F->".to_string()
            })
        );
        assert_eq!(
            TransitionCode::parse("T->A,F->B,T->C"),
            Err(CodeError::TooManyBranches { count: 3 })
        );
    }

    #[test]
    fn parse_keeps_tokens_trimmed() {
        assert_eq!(
            TransitionCode::parse("  T->  NQIC "),
            Ok(TransitionCode::Branch {
                outcome: true,
                target: "NQIC",
            })
        );
        assert_eq!(TransitionCode::parse(" PQS "), Ok(TransitionCode::Goto("PQS")));
    }
}
