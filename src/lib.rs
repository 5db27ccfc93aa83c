//! Flowstate: a finite-state-machine engine driven by a transition DSL
//!
//! An algorithm is written as an ordered list of named states. Each state
//! carries a short transition code, and the engine infers its role from the
//! number of transitions the code compiles to:
//!
//! - **Action**: one transition; its handler mutates the instance data
//! - **Decision**: two transitions; its handler is a predicate choosing the branch
//! - **Terminal**: no transitions and no handler
//!
//! Codes refer to other states by acronym, the uppercase letters of the
//! name (`NextQueryInCache` is `NQIC`). An empty code falls through to the
//! next declared state, `"0"` ends the machine, `"F->X"` branches to `X` when
//! the predicate is false, and `"T->X, F->Y"` names both branches.
//!
//! # Example
//!
//! ```rust
//! use flowstate::builder::MachineTypeBuilder;
//! use flowstate::runtime::{Machine, MachineInstance};
//!
//! #[derive(Default)]
//! struct Retry {
//!     attempts: u32,
//! }
//!
//! impl Machine for Retry {
//!     fn define(builder: MachineTypeBuilder<Self>) -> MachineTypeBuilder<Self> {
//!         builder
//!             .state("Init", "")
//!             .state("Check", "F->I")
//!             .state("Done", "0")
//!             .action("Init", |r: &mut Retry| r.attempts += 1)
//!             .decision("Check", |r: &Retry| r.attempts >= 3)
//!     }
//! }
//!
//! let mut run = MachineInstance::new(Retry::default()).unwrap();
//! run.run_to_completion().unwrap();
//!
//! assert_eq!(run.state_name(), "Done");
//! assert_eq!(run.step_count(), 6);
//! assert_eq!(run.visits_of("Check"), Some(3));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod enforcement;
pub mod graph;
pub mod runtime;
pub mod shell;

#[doc(hidden)]
pub use paste;

// Re-export commonly used types
pub use builder::{BuildError, MachineTypeBuilder};
pub use config::{ConfigError, EngineConfig, TerminalStepPolicy};
pub use crate::core::{Handler, HandlerError, StateId, StateKind, TransitionLog};
pub use runtime::{InstancePool, Machine, MachineInstance, MachineType, RuntimeError, StepResult};
