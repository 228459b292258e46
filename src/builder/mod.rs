//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder and macros for creating state
//! machines with minimal boilerplate while keeping states strongly typed.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, BuildIssue};
pub use machine::{Factory, StartStatePolicy, StateMachineBuilder};
