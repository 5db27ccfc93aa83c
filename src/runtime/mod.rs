//! Machine runtime.
//!
//! This module executes compiled machine types:
//! - [`MachineType`] is the immutable, shared result of a build
//! - [`MachineInstance`] steps, runs and replays one live machine
//! - [`Machine`] lets a data type define its own machine, cached per type
//! - [`InstancePool`] recycles finished instances

mod definition;
mod error;
mod machine;
mod machine_type;
mod pool;
pub mod registry;

pub use definition::Machine;
pub use error::RuntimeError;
pub use machine::{MachineInstance, StepResult};
pub use machine_type::MachineType;
pub use pool::InstancePool;
