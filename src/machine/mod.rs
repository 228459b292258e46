//! The running state machine.
//!
//! This module is the execution engine around the static table in
//! [`crate::core`]:
//!
//! - **Pipeline**: global and per-transition middleware chained by explicit
//!   continuations, ending in the guard stage
//! - **Registry**: middleware and the callbacks fired after a commit
//! - **Engine**: [`StateMachine`], which owns the current state and context
//!
//! Everything runs synchronously on the caller's thread. A machine is not
//! meant to be shared between threads without external locking.

mod engine;
mod pipeline;
mod registry;

pub use engine::{MachineParts, StateMachine};
pub use pipeline::{GlobalMiddleware, GlobalNext, Middleware, Next};
pub use registry::{Callback, GlobalStateCallback, GlobalTransitionCallback, Registry};
