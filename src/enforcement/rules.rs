//! Visit rules for machine instances using Validation.

use crate::core::StateId;
use crate::enforcement::violations::VisitViolation;
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of checking a set of visit rules.
pub type VisitCheck = Validation<(), NonEmptyVec<VisitViolation>>;

/// Per-instance visit-count rules.
///
/// A state is visited each time a step leaves it. Maximum rules are checked
/// before a state's handler runs; exact rules once the machine reaches a
/// terminal state.
/// Setting an exact count also caps the maximum at that count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisitRules {
    max: BTreeMap<StateId, usize>,
    exact: BTreeMap<StateId, usize>,
}

impl VisitRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max(&mut self, state: StateId, visits: usize) {
        self.max.insert(state, visits);
    }

    pub fn set_exact(&mut self, state: StateId, visits: usize) {
        self.max.insert(state, visits);
        self.exact.insert(state, visits);
    }

    pub fn is_empty(&self) -> bool {
        self.max.is_empty() && self.exact.is_empty()
    }

    pub fn clear(&mut self) {
        self.max.clear();
        self.exact.clear();
    }

    /// Check the maximum rule for `state`, if any, against the visit count
    /// it would reach by leaving it once more.
    pub fn check_entry(
        &self,
        state: StateId,
        visits: usize,
        name_of: impl Fn(StateId) -> String,
    ) -> Result<(), VisitViolation> {
        match self.max.get(&state) {
            Some(&max) if visits > max => Err(VisitViolation::TooManyVisits {
                state: name_of(state),
                max,
                visits,
            }),
            _ => Ok(()),
        }
    }

    /// Check every exact rule, accumulating ALL mismatches.
    pub fn check_exact(&self, visits: &[usize], name_of: impl Fn(StateId) -> String) -> VisitCheck {
        let checks: Vec<VisitCheck> = self
            .exact
            .iter()
            .map(|(&state, &expected)| {
                let count = visits.get(state.index()).copied().unwrap_or(0);
                if count != expected {
                    Validation::fail(VisitViolation::WrongVisitCount {
                        state: name_of(state),
                        expected,
                        visits: count,
                    })
                } else {
                    Validation::success(())
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(id: StateId) -> String {
        format!("S{}", id.index())
    }

    #[test]
    fn empty_rules_always_pass() {
        let rules = VisitRules::new();
        assert!(rules.is_empty());
        assert!(rules.check_entry(StateId(0), 9, name).is_ok());
        assert!(rules.check_exact(&[9, 9], name).is_success());
    }

    #[test]
    fn max_rule_allows_the_limit_itself() {
        let mut rules = VisitRules::new();
        rules.set_max(StateId(1), 3);

        assert!(rules.check_entry(StateId(1), 3, name).is_ok());
        assert!(rules.check_entry(StateId(0), 4, name).is_ok());

        match rules.check_entry(StateId(1), 4, name) {
            Err(VisitViolation::TooManyVisits { state, max, visits }) => {
                assert_eq!(state, "S1");
                assert_eq!(max, 3);
                assert_eq!(visits, 4);
            }
            other => panic!("Expected violation, got {other:?}"),
        }
    }

    #[test]
    fn exact_rules_accumulate_all_mismatches() {
        let mut rules = VisitRules::new();
        rules.set_exact(StateId(0), 1);
        rules.set_exact(StateId(1), 2);
        rules.set_exact(StateId(2), 0);

        match rules.check_exact(&[2, 1, 0], name) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                let states: Vec<&str> = errors.iter().map(|e| e.state()).collect();
                assert!(states.contains(&"S0"));
                assert!(states.contains(&"S1"));
            }
            Validation::Success(_) => panic!("Expected violations, got success"),
        }
    }

    #[test]
    fn exact_rule_also_caps_maximum() {
        let mut rules = VisitRules::new();
        rules.set_exact(StateId(0), 2);

        assert!(rules.check_entry(StateId(0), 2, name).is_ok());
        assert!(rules.check_entry(StateId(0), 3, name).is_err());
    }

    #[test]
    fn clear_removes_every_rule() {
        let mut rules = VisitRules::new();
        rules.set_max(StateId(0), 1);
        rules.set_exact(StateId(1), 1);
        rules.clear();

        assert!(rules.is_empty());
    }
}
