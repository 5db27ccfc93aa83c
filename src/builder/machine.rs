//! Builder for compiled machine types.

use crate::builder::binding::{bind_handlers, conclude};
use crate::builder::error::BuildError;
use crate::builder::transition::compile_code;
use crate::config::EngineConfig;
use crate::core::{
    handler_name, AcronymIndex, Handler, HandlerError, StateDescriptor, StateId, TransitionTable,
};
use crate::runtime::MachineType;
use stillwater::validation::Validation;

/// Builder for a [`MachineType`] with a fluent API.
///
/// States are declared in order with their transition codes; handlers are
/// registered under the state name with its first character lower-cased.
///
/// # Example
///
/// ```rust
/// use flowstate::builder::MachineTypeBuilder;
///
/// struct Counter { value: u32 }
///
/// let machine = MachineTypeBuilder::<Counter>::named("Counter")
///     .state("Bump", "")
///     .state("IsLarge", "F->B")
///     .state("CountComplete", "0")
///     .action("Bump", |c: &mut Counter| c.value += 1)
///     .decision("IsLarge", |c: &Counter| c.value >= 3)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.state_names(), vec!["Bump", "IsLarge", "CountComplete"]);
/// ```
pub struct MachineTypeBuilder<D> {
    name: String,
    declarations: Vec<(String, String)>,
    handlers: Vec<(String, Handler<D>)>,
    start: Option<String>,
    config: EngineConfig,
}

impl<D: 'static> MachineTypeBuilder<D> {
    /// Create a builder named after the data type.
    pub fn new() -> Self {
        let full = std::any::type_name::<D>();
        let short = full.split('<').next().unwrap_or(full);
        let short = short.rsplit("::").next().unwrap_or(short);
        Self::named(short)
    }

    /// Create a builder with an explicit machine name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
            handlers: Vec::new(),
            start: None,
            config: EngineConfig::default(),
        }
    }

    /// Rename the machine.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare the next state and its transition code.
    pub fn state(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.declarations.push((name.into(), code.into()));
        self
    }

    /// Declare several states at once, in order.
    pub fn states(mut self, declarations: &[(&str, &str)]) -> Self {
        self.declarations.extend(
            declarations
                .iter()
                .map(|(name, code)| (name.to_string(), code.to_string())),
        );
        self
    }

    /// Register an action handler for `state`.
    pub fn action<F>(self, state: &str, procedure: F) -> Self
    where
        F: Fn(&mut D) + Send + Sync + 'static,
    {
        self.handler(&handler_name(state), Handler::action(procedure))
    }

    /// Register a fallible action handler for `state`.
    pub fn try_action<F>(self, state: &str, procedure: F) -> Self
    where
        F: Fn(&mut D) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handler(&handler_name(state), Handler::try_action(procedure))
    }

    /// Register a decision handler for `state`.
    pub fn decision<F>(self, state: &str, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.handler(&handler_name(state), Handler::decision(predicate))
    }

    /// Register a fallible decision handler for `state`.
    pub fn try_decision<F>(self, state: &str, predicate: F) -> Self
    where
        F: Fn(&D) -> Result<bool, HandlerError> + Send + Sync + 'static,
    {
        self.handler(&handler_name(state), Handler::try_decision(predicate))
    }

    /// Register a handler under its handler name (`"init"` for state `Init`).
    pub fn handler(mut self, name: &str, handler: Handler<D>) -> Self {
        self.handlers.push((name.to_string(), handler));
        self
    }

    /// Start instances somewhere other than the first declared state.
    pub fn start(mut self, state: impl Into<String>) -> Self {
        self.start = Some(state.into());
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Compile and validate the machine type.
    ///
    /// Compilation and binding each report every problem they find at once.
    pub fn build(self) -> Result<MachineType<D>, BuildError> {
        let name = self.name.clone();
        let result = self.compile();
        match &result {
            Ok(machine) => tracing::info!(
                machine = %name,
                states = machine.states().len(),
                "compiled machine type"
            ),
            Err(e) => tracing::error!(
                machine = %name,
                problems = e.problems().len(),
                error = %e,
                "machine type failed validation"
            ),
        }
        result
    }

    fn compile(self) -> Result<MachineType<D>, BuildError> {
        if self.declarations.is_empty() {
            return Err(BuildError::NoStates);
        }

        let index = AcronymIndex::build(self.declarations.iter().map(|(name, _)| name.as_str()))?;
        let count = self.declarations.len();

        let mut checks = Vec::with_capacity(count);
        let mut rows = Vec::with_capacity(count);
        for (position, (state, code)) in self.declarations.iter().enumerate() {
            match compile_code(state, code, position, count, &index) {
                Ok(row) => {
                    rows.push(row);
                    checks.push(Validation::success(()));
                }
                Err(e) => checks.push(Validation::fail(e)),
            }
        }
        conclude(checks)?;

        let states: Vec<StateDescriptor> = self
            .declarations
            .into_iter()
            .enumerate()
            .map(|(index, (name, code))| StateDescriptor { name, index, code })
            .collect();
        let table = TransitionTable::new(rows);

        let start = match self.start {
            None => StateId(0),
            Some(start) => index
                .resolve(&start)
                .map(StateId)
                .ok_or(BuildError::UnknownStartState { state: start })?,
        };

        let handlers = bind_handlers(&states, &table, self.handlers, &self.config)?;

        Ok(MachineType::new(
            self.name,
            states,
            index,
            table,
            handlers,
            start,
            self.config,
        ))
    }
}

impl<D: 'static> Default for MachineTypeBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StateKind, Transitions};

    #[derive(Default)]
    struct Probe {
        counter: u32,
    }

    fn scenario() -> MachineTypeBuilder<Probe> {
        MachineTypeBuilder::new()
            .state("Init", "")
            .state("Check", "F->I")
            .state("Done", "0")
            .action("Init", |p: &mut Probe| p.counter += 1)
            .decision("Check", |p: &Probe| p.counter >= 3)
    }

    #[test]
    fn builder_names_machine_after_data_type() {
        let machine = scenario().build().unwrap();
        assert_eq!(machine.name(), "Probe");
    }

    #[test]
    fn name_overrides_the_default() {
        let machine = scenario().name("Renamed").build().unwrap();
        assert_eq!(machine.name(), "Renamed");
    }

    #[test]
    fn builder_requires_states() {
        let result = MachineTypeBuilder::<Probe>::new().build();
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn builder_compiles_scenario_table() {
        let machine = scenario().build().unwrap();

        assert_eq!(machine.kind_of("Init"), Some(StateKind::Action));
        assert_eq!(machine.kind_of("Check"), Some(StateKind::Decision));
        assert_eq!(machine.kind_of("Done"), Some(StateKind::Terminal));
        assert_eq!(
            machine.transitions(StateId(1)),
            Some(&Transitions::Decision {
                on_true: StateId(2),
                on_false: StateId(0),
            })
        );
    }

    #[test]
    fn compile_errors_are_accumulated() {
        let result = MachineTypeBuilder::<Probe>::new()
            .state("Init", "XX")
            .state("Check", "T->I,T->D")
            .state("Done", "0")
            .build();

        let err = result.err().unwrap();
        assert_eq!(err.problems().len(), 2);
        assert!(matches!(err, BuildError::Multiple(_)));
    }

    #[test]
    fn acronym_collision_is_fatal() {
        let result = MachineTypeBuilder::<Probe>::new()
            .state("AddToStack", "")
            .state("AfterTheStart", "")
            .state("CalcComplete", "0")
            .build();

        assert!(matches!(result, Err(BuildError::AcronymCollision { .. })));
    }

    #[test]
    fn explicit_start_state_is_resolved() {
        let machine = scenario().start("C").build().unwrap();
        assert_eq!(machine.start(), StateId(1));

        let result = scenario().start("Nowhere").build();
        assert!(matches!(result, Err(BuildError::UnknownStartState { .. })));
    }

    #[test]
    fn states_accepts_static_tables() {
        const TABLE: &[(&str, &str)] = &[("Init", ""), ("Check", "F->I"), ("Done", "0")];

        let machine = MachineTypeBuilder::<Probe>::named("Table")
            .states(TABLE)
            .action("Init", |p: &mut Probe| p.counter += 1)
            .decision("Check", |p: &Probe| p.counter >= 3)
            .build()
            .unwrap();

        assert_eq!(machine.name(), "Table");
        assert_eq!(machine.states().len(), 3);
    }
}
