//! Transition log.
//!
//! Every step a machine takes is recorded as a [`StepRecord`]. The log is
//! what deterministic replay consumes: decision outcomes are stored with
//! each record so a run can be reproduced without re-evaluating predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single step.
///
/// # Example
///
/// ```rust
/// use flowstate::core::StepRecord;
/// use chrono::Utc;
///
/// let record = StepRecord {
///     step: 1,
///     from: "Check".to_string(),
///     to: "Init".to_string(),
///     branch: Some(false),
///     timestamp: Utc::now(),
/// };
///
/// assert!(record.is_decision());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step counter after this step was taken
    pub step: usize,
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// Predicate outcome for decision states, `None` for actions
    pub branch: Option<bool>,
    /// When the step was taken
    pub timestamp: DateTime<Utc>,
}

impl StepRecord {
    pub fn is_decision(&self) -> bool {
        self.branch.is_some()
    }
}

/// Ordered log of steps.
///
/// # Example
///
/// ```rust
/// use flowstate::core::{StepRecord, TransitionLog};
/// use chrono::Utc;
///
/// let mut log = TransitionLog::new();
/// log.record(StepRecord {
///     step: 1,
///     from: "Start".to_string(),
///     to: "Middle".to_string(),
///     branch: None,
///     timestamp: Utc::now(),
/// });
/// log.record(StepRecord {
///     step: 2,
///     from: "Middle".to_string(),
///     to: "End".to_string(),
///     branch: Some(true),
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.get_path(), vec!["Start", "Middle", "End"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionLog {
    records: Vec<StepRecord>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record.
    pub fn record(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    /// States traversed: the first source, then each destination.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Decision outcomes in the order they were taken.
    pub fn branches(&self) -> Vec<bool> {
        self.records.iter().filter_map(|r| r.branch).collect()
    }

    /// Wall time between the first and last recorded step.
    ///
    /// Returns `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
