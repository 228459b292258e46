//! Core State trait for state machine states.
//!
//! States are opaque values compared by equality. The only thing the engine
//! needs beyond equality and hashing is a stable textual name, which is what
//! ends up in schema and checkpoint documents.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the engine copies the destination state on every transition
/// - `Eq` + `Hash`: transitions and state callbacks are indexed by state
/// - `Debug`: states must be debuggable for diagnostics
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum TaskState {
///     Pending,
///     Running,
///     Complete,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///             Self::Complete => "Complete",
///         }
///     }
/// }
///
/// assert_eq!(TaskState::Running.name(), "Running");
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync {
    /// Get the state's textual name.
    ///
    /// The name is written to schema and checkpoint documents, and decoders
    /// handed to the import functions receive it back. Two distinct states
    /// must not share a name.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self
    }
}

impl State for &'static str {
    fn name(&self) -> &str {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Processing.name(), "Processing");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn string_states_name_themselves() {
        let state = String::from("AJAR");
        assert_eq!(state.name(), "AJAR");
        assert_eq!("OPEN".name(), "OPEN");
    }

    #[test]
    fn state_is_usable_as_map_key() {
        let mut counts: HashMap<TestState, usize> = HashMap::new();
        *counts.entry(TestState::Processing).or_default() += 1;
        *counts.entry(TestState::Processing).or_default() += 1;

        assert_eq!(counts[&TestState::Processing], 2);
        assert!(!counts.contains_key(&TestState::Complete));
    }

    #[test]
    fn state_is_comparable() {
        let state1 = TestState::Processing;
        let state2 = TestState::Processing;
        let state3 = TestState::Complete;

        assert_eq!(state1, state2);
        assert_ne!(state1, state3);
    }
}
