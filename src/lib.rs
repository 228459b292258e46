//! Switchyard: a generic finite state machine engine
//!
//! A machine is a table of named transitions between states, a mutable
//! context, and a current state. Firing a transition runs a pipeline:
//! global middleware, per-transition middleware, then the guard stage
//! (start state and guard predicate). On success the state moves, the
//! transition's action mutates the context, and callbacks observe the
//! result.
//!
//! # Core Concepts
//!
//! - **State**: any `Clone + Eq + Hash` type with a name, via the [`State`] trait
//! - **Transitions**: named edges with an optional guard and action
//! - **Middleware**: wrappers around the guard stage that may veto or adjust
//! - **Callbacks**: observers of transitions and state entries
//! - **Schema**: the table's structure as JSON, importable into a builder
//! - **Checkpoint**: current state plus encoded context, restorable later
//!
//! # Example
//!
//! ```rust
//! use switchyard::builder::StateMachineBuilder;
//! use switchyard::core::Transition;
//! use switchyard::state_enum;
//!
//! state_enum! {
//!     pub enum Door {
//!         Open,
//!         Ajar,
//!         Closed,
//!     }
//! }
//!
//! let mut door = StateMachineBuilder::new()
//!     .transition(
//!         Transition::new("close", Door::Ajar, Door::Closed)
//!             .when(|openness: &u8| *openness <= 1)
//!             .action(|openness: &mut u8| *openness = 0),
//!     )
//!     .add_transition("push", Door::Open, Door::Ajar)
//!     .initial(Door::Ajar)
//!     .context(1u8)
//!     .build()
//!     .unwrap();
//!
//! door.transition("close").unwrap();
//! assert_eq!(door.state(), &Door::Closed);
//! assert_eq!(door.context(), &0);
//! assert!(door.transition("close").is_err());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod error;
pub mod machine;
pub mod schema;

// Re-export commonly used types
pub use builder::{BuildError, StartStatePolicy, StateMachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError, ContextCodec, JsonCodec};
pub use core::{Guard, State, Transition, TransitionError};
pub use error::{Error, Result};
pub use machine::{MachineParts, StateMachine};
pub use schema::{Schema, SchemaError};
