//! Client-facing machine definitions.

use crate::builder::{BuildError, MachineTypeBuilder};
use crate::config::EngineConfig;
use crate::core::HandlerError;
use crate::runtime::{registry, MachineType};
use std::sync::Arc;

/// A client algorithm expressed as a state machine.
///
/// The implementing type is the instance data. `define` declares the states
/// and registers their handlers; the compiled type is built on first use
/// and cached for the life of the process.
///
/// # Example
///
/// ```rust
/// use flowstate::builder::MachineTypeBuilder;
/// use flowstate::runtime::{Machine, MachineInstance};
///
/// struct Countdown { left: u32 }
///
/// impl Machine for Countdown {
///     fn define(builder: MachineTypeBuilder<Self>) -> MachineTypeBuilder<Self> {
///         builder
///             .state("Tick", "")
///             .state("IsZero", "F->T")
///             .state("LaunchComplete", "0")
///             .action("Tick", |c: &mut Countdown| c.left -= 1)
///             .decision("IsZero", |c: &Countdown| c.left == 0)
///     }
/// }
///
/// let mut run = MachineInstance::new(Countdown { left: 3 }).unwrap();
/// run.run_to_completion().unwrap();
/// assert_eq!(run.state_name(), "LaunchComplete");
/// assert_eq!(run.step_count(), 6);
/// ```
pub trait Machine: Sized + 'static {
    /// Declare states and bind handlers.
    fn define(builder: MachineTypeBuilder<Self>) -> MachineTypeBuilder<Self>;

    /// Engine settings for this machine type.
    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    /// Human-readable lines describing the instance data.
    fn diagnostics(&self) -> Vec<String> {
        vec!["No diagnostic info available, override Machine::diagnostics".to_string()]
    }

    /// Accept out-of-band input while parked in `state`.
    fn inject(&mut self, state: &str, input: &str) -> Result<(), HandlerError> {
        Err(HandlerError::new(format!(
            "state {state} does not accept input '{input}'; override Machine::inject"
        )))
    }

    /// The compiled, cached machine type.
    fn machine_type() -> Result<Arc<MachineType<Self>>, BuildError> {
        registry::machine_type::<Self>()
    }
}
