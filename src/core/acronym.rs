//! Acronym registry for state names.
//!
//! Transition codes refer to states by their acronym: the uppercase
//! characters of the state name, in order. `NextQueryInCache` is `NQIC`,
//! `AddResultToCache` is `ARTC`.

use crate::builder::BuildError;
use std::collections::HashMap;

/// Derive the acronym of a state name.
///
/// # Example
///
/// ```rust
/// use flowstate::core::acronym_of;
///
/// assert_eq!(acronym_of("HaveAnotherMstEdge"), "HAME");
/// assert_eq!(acronym_of("CalcComplete"), "CC");
/// assert_eq!(acronym_of("lowercase"), "");
/// ```
pub fn acronym_of(name: &str) -> String {
    name.chars().filter(|c| c.is_uppercase()).collect()
}

/// Bidirectional index between state names and their acronyms.
///
/// Built once per machine type. Acronyms must be unique: two states whose
/// acronyms coincide are rejected rather than silently aliased.
#[derive(Clone, Debug, Default)]
pub struct AcronymIndex {
    by_acronym: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    acronyms: Vec<String>,
}

impl AcronymIndex {
    /// Build the index for an ordered list of state names.
    ///
    /// Indices returned by lookups are positions in `names`.
    pub fn build<'a, I>(names: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::default();
        let mut ordered: Vec<&str> = Vec::new();

        for (position, name) in names.into_iter().enumerate() {
            let acronym = acronym_of(name);
            if acronym.is_empty() {
                return Err(BuildError::InvalidStateName {
                    name: name.to_string(),
                    reason: "name has no uppercase characters to form an acronym".to_string(),
                });
            }
            if index.by_name.insert(name.to_string(), position).is_some() {
                return Err(BuildError::DuplicateState {
                    name: name.to_string(),
                });
            }
            if let Some(&previous) = index.by_acronym.get(&acronym) {
                return Err(BuildError::AcronymCollision {
                    acronym,
                    first: ordered[previous].to_string(),
                    second: name.to_string(),
                });
            }
            index.by_acronym.insert(acronym.clone(), position);
            index.acronyms.push(acronym);
            ordered.push(name);
        }

        Ok(index)
    }

    /// Look up a state by acronym only.
    pub fn lookup(&self, acronym: &str) -> Option<usize> {
        self.by_acronym.get(acronym).copied()
    }

    /// Resolve a transition-code token: acronym first, then full state name.
    pub fn resolve(&self, token: &str) -> Option<usize> {
        self.lookup(token).or_else(|| self.by_name.get(token).copied())
    }

    /// Acronym of the state at `position`.
    pub fn acronym(&self, position: usize) -> Option<&str> {
        self.acronyms.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.acronyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acronyms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLATZ: [&str; 9] = [
        "InitMachine",
        "AddNextProbeToStack",
        "NextQueryInCache",
        "AddResultToCache",
        "AddQueryToStack",
        "PollQueryStack",
        "QueryStackEmpty",
        "IsNextAboveTarget",
        "CalcComplete",
    ];

    #[test]
    fn acronym_keeps_uppercase_in_order() {
        assert_eq!(acronym_of("AddNextProbeToStack"), "ANPTS");
        assert_eq!(acronym_of("Init"), "I");
        assert_eq!(acronym_of("IOBuffer"), "IOB");
    }

    #[test]
    fn lookup_maps_acronym_to_position() {
        let index = AcronymIndex::build(COLLATZ).unwrap();

        assert_eq!(index.lookup("NQIC"), Some(2));
        assert_eq!(index.lookup("CC"), Some(8));
        assert_eq!(index.lookup("XYZ"), None);
        assert_eq!(index.len(), 9);
    }

    #[test]
    fn resolve_falls_back_to_full_name() {
        let index = AcronymIndex::build(COLLATZ).unwrap();

        assert_eq!(index.resolve("PQS"), Some(5));
        assert_eq!(index.resolve("PollQueryStack"), Some(5));
        assert_eq!(index.resolve("pollQueryStack"), None);
    }

    #[test]
    fn colliding_acronyms_are_rejected() {
        let result = AcronymIndex::build(["ScanNext", "StepNode"]);

        match result {
            Err(BuildError::AcronymCollision {
                acronym,
                first,
                second,
            }) => {
                assert_eq!(acronym, "SN");
                assert_eq!(first, "ScanNext");
                assert_eq!(second, "StepNode");
            }
            other => panic!("expected acronym collision, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = AcronymIndex::build(["Start", "Start"]);
        assert!(matches!(result, Err(BuildError::DuplicateState { .. })));
    }

    #[test]
    fn names_without_uppercase_are_rejected() {
        let result = AcronymIndex::build(["Start", "finish"]);
        assert!(matches!(result, Err(BuildError::InvalidStateName { .. })));
    }
}
