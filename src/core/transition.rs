//! Named transitions between states.

use crate::core::{Guard, State};
use std::fmt;

/// Side effect applied to the context after a transition commits.
pub type Action<C> = Box<dyn Fn(&mut C) + Send + Sync>;

/// Errors that can occur while firing a transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Transition not found: {name}")]
    NotFound { name: String },

    #[error("Transition '{transition}' starts at '{expected}' but the machine is in '{actual}'")]
    StateMismatch {
        transition: String,
        expected: String,
        actual: String,
    },

    #[error("Condition returned false for transition '{transition}'")]
    ConditionFailed { transition: String },

    #[error("Transition '{transition}' rejected by middleware: {reason}")]
    Rejected { transition: String, reason: String },

    #[error("Callback failed after transition '{transition}': {reason}")]
    CallbackFailed { transition: String, reason: String },
}

impl TransitionError {
    /// Error for middleware that refuses to let a transition proceed.
    pub fn rejected(transition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            transition: transition.into(),
            reason: reason.into(),
        }
    }

    /// Error for a callback that cannot accept a committed transition.
    pub fn callback_failed(transition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CallbackFailed {
            transition: transition.into(),
            reason: reason.into(),
        }
    }
}

/// A named edge from `start` to `end` with an optional guard and action.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Transition;
///
/// struct Door {
///     openness: u8,
/// }
///
/// let close = Transition::new("close", "AJAR", "CLOSE")
///     .when(|door: &Door| door.openness <= 1)
///     .action(|door: &mut Door| door.openness = 0);
///
/// assert!(close.can_fire(&"AJAR", &Door { openness: 1 }));
/// assert!(!close.can_fire(&"AJAR", &Door { openness: 40 }));
/// assert!(!close.can_fire(&"OPEN", &Door { openness: 1 }));
/// ```
pub struct Transition<S: State, C> {
    pub name: String,
    pub start: S,
    pub end: S,
    pub guard: Option<Guard<C>>,
    pub action: Option<Action<C>>,
}

impl<S: State, C> Transition<S, C> {
    /// Create an unguarded transition without an action.
    pub fn new(name: impl Into<String>, start: S, end: S) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            guard: None,
            action: None,
        }
    }

    /// Set the guard predicate, replacing any previous one.
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Set the action, replacing any previous one.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Check if this transition can fire from `current` with this context.
    pub fn can_fire(&self, current: &S, context: &C) -> bool {
        self.admit(current, context).is_ok()
    }

    /// Guard stage of the pipeline: start state first, then the predicate.
    pub(crate) fn admit(&self, current: &S, context: &C) -> Result<(), TransitionError> {
        self.ensure_start(current)?;

        match &self.guard {
            Some(guard) if !guard.check(context) => Err(TransitionError::ConditionFailed {
                transition: self.name.clone(),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn ensure_start(&self, current: &S) -> Result<(), TransitionError> {
        if *current != self.start {
            return Err(TransitionError::StateMismatch {
                transition: self.name.clone(),
                expected: self.start.name().to_string(),
                actual: current.name().to_string(),
            });
        }
        Ok(())
    }
}

impl<S: State, C> fmt::Debug for Transition<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("guarded", &self.guard.is_some())
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
