//! Visit-count enforcement for machine instances.
//!
//! Rules use Stillwater's `Validation` type so that a finished run reports
//! ALL mismatched visit counts instead of the first one found.
//!
//! # Example
//!
//! ```rust
//! use flowstate::builder::MachineTypeBuilder;
//! use flowstate::runtime::MachineInstance;
//! use std::sync::Arc;
//!
//! struct Counter { value: u32 }
//!
//! let machine = MachineTypeBuilder::<Counter>::new()
//!     .state("Bump", "")
//!     .state("IsLarge", "F->B")
//!     .state("CountComplete", "0")
//!     .action("Bump", |c: &mut Counter| c.value += 1)
//!     .decision("IsLarge", |c: &Counter| c.value >= 3)
//!     .build()
//!     .unwrap();
//!
//! let mut instance = MachineInstance::with_type(Arc::new(machine), Counter { value: 0 });
//! instance.set_exact_visits("IL", 3).unwrap();
//! instance.run_to_completion().unwrap();
//! ```

pub mod rules;
pub mod violations;

pub use rules::{VisitCheck, VisitRules};
pub use violations::VisitViolation;
