//! Core state machine types.
//!
//! This module contains the static shape of a machine:
//! - State definitions via the `State` trait
//! - Guard predicates and actions over the context
//! - Named transitions and the table that indexes them
//!
//! Nothing here mutates a running machine; that is the job of
//! [`crate::machine`].

mod guard;
mod state;
mod table;
mod transition;

pub use guard::Guard;
pub use state::State;
pub use table::TransitionTable;
pub use transition::{Action, Transition, TransitionError};
