//! Core machine vocabulary.
//!
//! This module contains the building blocks every other layer shares:
//! - Acronyms and the index transition codes resolve through
//! - State kinds and the compiled transition table
//! - Handlers bound to non-terminal states
//! - The transition log consumed by replay

mod acronym;
mod handler;
mod history;
mod kind;
mod table;

pub use acronym::{acronym_of, AcronymIndex};
pub use handler::{handler_name, Handler, HandlerError};
pub use history::{StepRecord, TransitionLog};
pub use kind::StateKind;
pub use table::{StateDescriptor, StateId, TransitionTable, Transitions};
