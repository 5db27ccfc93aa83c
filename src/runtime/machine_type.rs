//! Compiled, immutable machine types.

use crate::config::EngineConfig;
use crate::core::{
    AcronymIndex, Handler, StateDescriptor, StateId, StateKind, TransitionTable, Transitions,
};
use crate::graph::{self, DotGraph};
use std::fmt;

/// A validated machine description shared by all of its instances.
///
/// Built once by [`MachineTypeBuilder`](crate::builder::MachineTypeBuilder)
/// and read-only afterwards. Instances hold it behind an `Arc`.
pub struct MachineType<D> {
    name: String,
    states: Vec<StateDescriptor>,
    acronyms: AcronymIndex,
    table: TransitionTable,
    handlers: Vec<Option<Handler<D>>>,
    start: StateId,
    config: EngineConfig,
}

impl<D> MachineType<D> {
    pub(crate) fn new(
        name: String,
        states: Vec<StateDescriptor>,
        acronyms: AcronymIndex,
        table: TransitionTable,
        handlers: Vec<Option<Handler<D>>>,
        start: StateId,
        config: EngineConfig,
    ) -> Self {
        Self {
            name,
            states,
            acronyms,
            table,
            handlers,
            start,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[StateDescriptor] {
        &self.states
    }

    /// State names in declaration order.
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn acronyms(&self) -> &AcronymIndex {
        &self.acronyms
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State new instances begin in.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Resolve a state by acronym or full name.
    pub fn id_of(&self, state: &str) -> Option<StateId> {
        self.acronyms.resolve(state.trim()).map(StateId)
    }

    pub fn name_of(&self, id: StateId) -> Option<&str> {
        self.states.get(id.index()).map(|s| s.name.as_str())
    }

    /// Name for messages; ids from another machine render as their index.
    pub(crate) fn label(&self, id: StateId) -> String {
        self.name_of(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn kind(&self, id: StateId) -> Option<StateKind> {
        self.table.get(id).map(Transitions::kind)
    }

    pub fn kind_of(&self, state: &str) -> Option<StateKind> {
        self.id_of(state).and_then(|id| self.kind(id))
    }

    pub fn transitions(&self, id: StateId) -> Option<&Transitions> {
        self.table.get(id)
    }

    /// Target names of a state: `[]`, `[next]` or `[on_true, on_false]`.
    pub fn targets_of(&self, state: &str) -> Option<Vec<&str>> {
        let id = self.id_of(state)?;
        let transitions = self.table.get(id)?;
        Some(
            transitions
                .targets()
                .into_iter()
                .filter_map(|target| self.name_of(target))
                .collect(),
        )
    }

    pub fn is_terminal(&self, id: StateId) -> bool {
        self.kind(id).map_or(true, StateKind::is_terminal)
    }

    pub(crate) fn handler(&self, id: StateId) -> Option<&Handler<D>> {
        self.handlers.get(id.index()).and_then(Option::as_ref)
    }

    /// Graphviz description of this machine.
    pub fn to_dot(&self) -> DotGraph {
        graph::export(self)
    }
}

impl<D> fmt::Debug for MachineType<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineType")
            .field("name", &self.name)
            .field("states", &self.states)
            .field("table", &self.table)
            .field("start", &self.start)
            .field("config", &self.config)
            .finish()
    }
}
