//! Middleware and callback registry.

use crate::core::{State, TransitionError};
use crate::machine::pipeline::{GlobalMiddleware, Middleware};
use std::collections::HashMap;

/// Observer called after any transition commits, with the transition name.
///
/// Callbacks cannot veto a transition: by the time they run the state has
/// moved. An `Err` stops the remaining callbacks and is returned to the
/// caller of `transition`.
pub type GlobalTransitionCallback<C> =
    Box<dyn Fn(&str, &C) -> Result<(), TransitionError> + Send + Sync>;

/// Observer called after a specific transition, or on entering a specific
/// state.
pub type Callback<C> = Box<dyn Fn(&C) -> Result<(), TransitionError> + Send + Sync>;

/// Observer called on entering any state, with the new state.
pub type GlobalStateCallback<S, C> =
    Box<dyn Fn(&S, &C) -> Result<(), TransitionError> + Send + Sync>;

/// Ordered interceptors and observers attached to a machine.
///
/// Every list keeps registration order and only grows while the machine is
/// being built.
pub struct Registry<S: State, C> {
    pub(crate) middlewares: HashMap<String, Vec<Middleware<C>>>,
    pub(crate) global_middlewares: Vec<GlobalMiddleware<C>>,
    pub(crate) transition_callbacks: HashMap<String, Vec<Callback<C>>>,
    pub(crate) global_transition_callbacks: Vec<GlobalTransitionCallback<C>>,
    pub(crate) state_callbacks: HashMap<S, Vec<Callback<C>>>,
    pub(crate) global_state_callbacks: Vec<GlobalStateCallback<S, C>>,
}

impl<S: State, C> Registry<S, C> {
    pub fn new() -> Self {
        Self {
            middlewares: HashMap::new(),
            global_middlewares: Vec::new(),
            transition_callbacks: HashMap::new(),
            global_transition_callbacks: Vec::new(),
            state_callbacks: HashMap::new(),
            global_state_callbacks: Vec::new(),
        }
    }

    /// Add middleware for the transition called `name`.
    pub fn add_middleware(&mut self, name: impl Into<String>, middleware: Middleware<C>) {
        self.middlewares
            .entry(name.into())
            .or_default()
            .push(middleware);
    }

    /// Add middleware that runs for every transition.
    pub fn add_global_middleware(&mut self, middleware: GlobalMiddleware<C>) {
        self.global_middlewares.push(middleware);
    }

    /// Observe the transition called `name`.
    pub fn add_transition_callback(&mut self, name: impl Into<String>, callback: Callback<C>) {
        self.transition_callbacks
            .entry(name.into())
            .or_default()
            .push(callback);
    }

    /// Observe every transition.
    pub fn add_global_transition_callback(&mut self, callback: GlobalTransitionCallback<C>) {
        self.global_transition_callbacks.push(callback);
    }

    /// Observe entering `state`.
    pub fn add_state_callback(&mut self, state: S, callback: Callback<C>) {
        self.state_callbacks.entry(state).or_default().push(callback);
    }

    /// Observe entering any state.
    pub fn add_global_state_callback(&mut self, callback: GlobalStateCallback<S, C>) {
        self.global_state_callbacks.push(callback);
    }

    pub(crate) fn middlewares_for(&self, name: &str) -> &[Middleware<C>] {
        self.middlewares
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Invoke observers for a committed transition.
    ///
    /// Order: every-transition, then this transition, then every-state, then
    /// the entered state. The first error stops dispatch.
    pub(crate) fn notify(
        &self,
        name: &str,
        state: &S,
        context: &C,
    ) -> Result<(), TransitionError> {
        for callback in &self.global_transition_callbacks {
            callback(name, context)?;
        }
        if let Some(callbacks) = self.transition_callbacks.get(name) {
            for callback in callbacks {
                callback(context)?;
            }
        }
        for callback in &self.global_state_callbacks {
            callback(state, context)?;
        }
        if let Some(callbacks) = self.state_callbacks.get(state) {
            for callback in callbacks {
                callback(context)?;
            }
        }
        Ok(())
    }
}

impl<S: State, C> Default for Registry<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
