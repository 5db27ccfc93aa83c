//! Machine instances: stepping, running, and replay.

use crate::builder::BuildError;
use crate::config::TerminalStepPolicy;
use crate::core::{StateId, StateKind, StepRecord, TransitionLog, Transitions};
use crate::enforcement::VisitRules;
use crate::runtime::{Machine, MachineType, RuntimeError};
use chrono::Utc;
use std::sync::Arc;
use stillwater::validation::Validation;
use uuid::Uuid;

/// Result of executing a single step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// Moved from one state to the next
    Advanced {
        from: StateId,
        to: StateId,
        branch: Option<bool>,
    },

    /// Already terminal; nothing changed
    Halted(StateId),
}

impl StepResult {
    pub fn is_halted(&self) -> bool {
        matches!(self, StepResult::Halted(_))
    }
}

/// One live run of a [`MachineType`].
pub struct MachineInstance<D> {
    machine: Arc<MachineType<D>>,
    current: StateId,
    step_count: usize,
    data: D,
    log: TransitionLog,
    visits: Vec<usize>,
    rules: VisitRules,
    run_id: Uuid,
}

impl<M: Machine> MachineInstance<M> {
    /// Create an instance of the cached machine type for `M`.
    pub fn new(data: M) -> Result<Self, BuildError> {
        Ok(Self::with_type(M::machine_type()?, data))
    }

    /// Diagnostic lines supplied by the instance data.
    pub fn diagnostics(&self) -> Vec<String> {
        self.data.diagnostics()
    }

    /// Forward out-of-band input to the instance data.
    pub fn inject(&mut self, input: &str) -> Result<(), RuntimeError> {
        let state = self.machine.label(self.current);
        self.data
            .inject(&state, input)
            .map_err(|source| RuntimeError::HandlerFailed { state, source })
    }
}

impl<D> MachineInstance<D> {
    /// Create an instance of an explicitly built machine type.
    pub fn with_type(machine: Arc<MachineType<D>>, data: D) -> Self {
        let visits = vec![0; machine.states().len()];
        let current = machine.start();
        Self {
            machine,
            current,
            step_count: 0,
            data,
            log: TransitionLog::new(),
            visits,
            rules: VisitRules::new(),
            run_id: Uuid::new_v4(),
        }
    }

    pub fn machine(&self) -> &Arc<MachineType<D>> {
        &self.machine
    }

    /// Current state.
    pub fn state(&self) -> StateId {
        self.current
    }

    pub fn state_name(&self) -> &str {
        self.machine.name_of(self.current).unwrap_or_default()
    }

    pub fn state_kind(&self) -> StateKind {
        self.machine.kind(self.current).unwrap_or(StateKind::Terminal)
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    /// Transition log; empty when recording is disabled.
    pub fn log(&self) -> &TransitionLog {
        &self.log
    }

    /// Times each state has been left, indexed by declaration order.
    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    pub fn visits_of(&self, state: &str) -> Option<usize> {
        let id = self.machine.id_of(state)?;
        self.visits.get(id.index()).copied()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn is_complete(&self) -> bool {
        self.machine.is_terminal(self.current)
    }

    /// Cap the number of times `state` may be left. A step that would exceed
    /// the cap fails before the handler runs and leaves the instance unchanged.
    pub fn set_max_visits(&mut self, state: &str, visits: usize) -> Result<(), RuntimeError> {
        let id = self.resolve(state)?;
        self.rules.set_max(id, visits);
        Ok(())
    }

    /// Require `state` to be left exactly `visits` times by completion.
    pub fn set_exact_visits(&mut self, state: &str, visits: usize) -> Result<(), RuntimeError> {
        let id = self.resolve(state)?;
        self.rules.set_exact(id, visits);
        Ok(())
    }

    /// Fail unless the instance is currently in `state`.
    pub fn require_state(&self, state: &str) -> Result<(), RuntimeError> {
        let id = self.resolve(state)?;
        if id == self.current {
            Ok(())
        } else {
            Err(RuntimeError::UnexpectedState {
                expected: self.machine.label(id),
                actual: self.machine.label(self.current),
            })
        }
    }

    /// Return to the start state with fresh bookkeeping and a new run id.
    ///
    /// Instance data and visit rules are left as they are.
    pub fn restart(&mut self) {
        self.current = self.machine.start();
        self.step_count = 0;
        self.log.clear();
        self.visits.iter_mut().for_each(|v| *v = 0);
        self.run_id = Uuid::new_v4();
    }

    /// Drop every visit rule.
    pub fn clear_visit_rules(&mut self) {
        self.rules.clear();
    }

    /// Execute one state.
    pub fn step(&mut self) -> Result<StepResult, RuntimeError> {
        self.advance(None)
    }

    /// Execute one state, substituting `outcome` for a decision's predicate.
    ///
    /// Action states run their handler as usual and ignore `outcome`.
    pub fn replay_step(&mut self, outcome: bool) -> Result<StepResult, RuntimeError> {
        self.advance(Some(outcome))
    }

    /// Step until a terminal state, then check exact visit counts.
    pub fn run_to_completion(&mut self) -> Result<(), RuntimeError> {
        while !self.is_complete() {
            self.step()?;
        }
        self.check_exact_visits()
    }

    /// Step until the current state is `target`.
    pub fn run_to_state(&mut self, target: &str) -> Result<(), RuntimeError> {
        let target = self.resolve(target)?;
        while self.current != target {
            if self.is_complete() {
                return Err(RuntimeError::TargetUnreachable {
                    target: self.machine.label(target),
                    halted: self.machine.label(self.current),
                });
            }
            self.step()?;
        }
        Ok(())
    }

    /// Step until the step counter equals `count`.
    pub fn run_to_step_count(&mut self, count: usize) -> Result<(), RuntimeError> {
        if count < self.step_count {
            return Err(RuntimeError::StepCountPassed {
                requested: count,
                current: self.step_count,
            });
        }
        while self.step_count < count {
            if self.is_complete() {
                return Err(RuntimeError::TargetUnreachable {
                    target: format!("step {count}"),
                    halted: self.machine.label(self.current),
                });
            }
            self.step()?;
        }
        Ok(())
    }

    /// Step until a step leaves `after`.
    pub fn run_past_state(&mut self, after: &str) -> Result<(), RuntimeError> {
        let after = self.resolve(after)?;
        loop {
            if self.is_complete() {
                return Err(RuntimeError::UnexpectedTerminal {
                    expected: self.machine.label(after),
                    halted: self.machine.label(self.current),
                });
            }
            let previous = self.current;
            self.step()?;
            if previous == after {
                return Ok(());
            }
        }
    }

    /// Step until `predicate` holds for the instance.
    ///
    /// Returns `TargetUnreachable` if the machine halts first.
    pub fn run_until<F>(&mut self, mut predicate: F) -> Result<(), RuntimeError>
    where
        F: FnMut(&Self) -> bool,
    {
        while !predicate(self) {
            if self.is_complete() {
                return Err(RuntimeError::TargetUnreachable {
                    target: "predicate".to_string(),
                    halted: self.machine.label(self.current),
                });
            }
            self.step()?;
        }
        Ok(())
    }

    /// Drive the instance through a recorded log.
    ///
    /// Each record must start at the current state and, once the recorded
    /// branch is forced, land on the recorded destination.
    pub fn replay(&mut self, log: &TransitionLog) -> Result<(), RuntimeError> {
        for record in log.records() {
            let current = self.machine.label(self.current);
            if current != record.from {
                return Err(self.diverged(record.step, &record.from, current));
            }

            let result = match record.branch {
                Some(outcome) => self.replay_step(outcome)?,
                None => self.step()?,
            };

            let landed = match result {
                StepResult::Advanced { to, .. } => self.machine.label(to),
                StepResult::Halted(at) => self.machine.label(at),
            };
            if landed != record.to {
                return Err(self.diverged(record.step, &record.to, landed));
            }
        }
        Ok(())
    }

    fn diverged(&self, step: usize, expected: &str, actual: String) -> RuntimeError {
        tracing::warn!(
            machine = %self.machine.name(),
            run_id = %self.run_id,
            step,
            expected,
            actual = %actual,
            "replay diverged"
        );
        RuntimeError::ReplayDiverged {
            step,
            expected: expected.to_string(),
            actual,
        }
    }

    fn resolve(&self, state: &str) -> Result<StateId, RuntimeError> {
        self.machine
            .id_of(state)
            .ok_or_else(|| RuntimeError::UnknownState {
                machine: self.machine.name().to_string(),
                state: state.to_string(),
            })
    }

    fn advance(&mut self, forced: Option<bool>) -> Result<StepResult, RuntimeError> {
        let from = self.current;
        let transitions = self
            .machine
            .transitions(from)
            .copied()
            .unwrap_or(Transitions::Terminal);

        let (to, branch) = match transitions {
            Transitions::Terminal => return self.terminal_step(),
            Transitions::Action(next) => {
                self.check_visit_limit(from)?;
                self.run_action(from)?;
                (next, None)
            }
            Transitions::Decision { on_true, on_false } => {
                self.check_visit_limit(from)?;
                let outcome = match forced {
                    Some(outcome) => outcome,
                    None => self.evaluate(from)?,
                };
                (if outcome { on_true } else { on_false }, Some(outcome))
            }
        };

        self.commit(from, to, branch);
        Ok(StepResult::Advanced { from, to, branch })
    }

    fn terminal_step(&self) -> Result<StepResult, RuntimeError> {
        match self.machine.config().terminal_step {
            TerminalStepPolicy::Ignore => Ok(StepResult::Halted(self.current)),
            TerminalStepPolicy::Reject => {
                tracing::warn!(
                    machine = %self.machine.name(),
                    run_id = %self.run_id,
                    state = %self.machine.label(self.current),
                    "step requested in terminal state"
                );
                Err(RuntimeError::TerminalStep {
                    machine: self.machine.name().to_string(),
                    state: self.machine.label(self.current),
                })
            }
        }
    }

    fn run_action(&mut self, state: StateId) -> Result<(), RuntimeError> {
        let machine = Arc::clone(&self.machine);
        let handler = machine.handler(state).ok_or_else(|| self.unbound(state))?;
        handler
            .run_action(&mut self.data)
            .map_err(|source| RuntimeError::HandlerFailed {
                state: machine.label(state),
                source,
            })
    }

    fn evaluate(&self, state: StateId) -> Result<bool, RuntimeError> {
        let handler = self
            .machine
            .handler(state)
            .ok_or_else(|| self.unbound(state))?;
        handler
            .evaluate(&self.data)
            .map_err(|source| RuntimeError::HandlerFailed {
                state: self.machine.label(state),
                source,
            })
    }

    fn unbound(&self, state: StateId) -> RuntimeError {
        RuntimeError::HandlerFailed {
            state: self.machine.label(state),
            source: crate::core::HandlerError::new("no handler bound to state"),
        }
    }

    fn check_visit_limit(&self, state: StateId) -> Result<(), RuntimeError> {
        let visits = self.visits.get(state.index()).copied().unwrap_or(0) + 1;
        self.rules
            .check_entry(state, visits, |id| self.machine.label(id))
            .map_err(|violation| {
                tracing::warn!(
                    machine = %self.machine.name(),
                    run_id = %self.run_id,
                    %violation,
                    "visit limit reached"
                );
                RuntimeError::VisitLimitExceeded(violation)
            })
    }

    fn commit(&mut self, from: StateId, to: StateId, branch: Option<bool>) {
        self.step_count += 1;
        if let Some(count) = self.visits.get_mut(from.index()) {
            *count += 1;
        }
        self.current = to;

        tracing::debug!(
            machine = %self.machine.name(),
            run_id = %self.run_id,
            step = self.step_count,
            from = %self.machine.label(from),
            to = %self.machine.label(to),
            ?branch,
            "transition"
        );

        if self.machine.config().record_transitions {
            self.log.record(StepRecord {
                step: self.step_count,
                from: self.machine.label(from),
                to: self.machine.label(to),
                branch,
                timestamp: Utc::now(),
            });
        }
    }

    fn check_exact_visits(&self) -> Result<(), RuntimeError> {
        let machine = &self.machine;
        match self.rules.check_exact(&self.visits, |id| machine.label(id)) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(RuntimeError::VisitCountMismatch(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for MachineInstance<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineInstance")
            .field("machine", &self.machine.name())
            .field("state", &self.state_name())
            .field("step_count", &self.step_count)
            .field("run_id", &self.run_id)
            .field("data", &self.data)
            .finish()
    }
}
