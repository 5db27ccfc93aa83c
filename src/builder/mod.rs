//! Builder API for machine types.
//!
//! This module turns an ordered list of `(state, code)` declarations plus a
//! set of named handlers into a validated [`MachineType`](crate::runtime::MachineType):
//! - The transition code compiler resolves each code into a table row
//! - The binding resolver matches handlers to states by naming convention
//! - Macros generate state enums with static declaration tables

mod binding;
pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::{BuildError, CodeError};
pub use machine::MachineTypeBuilder;
pub use transition::{compile_code, TransitionCode};
