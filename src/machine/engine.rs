//! State machine that fires named transitions over a mutable context.

use crate::checkpoint::ContextCodec;
use crate::core::{State, Transition, TransitionError, TransitionTable};
use crate::machine::pipeline;
use crate::machine::registry::Registry;
use std::fmt;
use tracing::{debug, trace};

/// Everything needed to construct a machine.
///
/// The builder hands this to its factory; callers that skip the builder can
/// fill it in directly.
pub struct MachineParts<S: State, C> {
    pub transitions: Vec<Transition<S, C>>,
    pub start_state: S,
    pub states: Vec<S>,
    pub context: C,
    pub registry: Registry<S, C>,
    pub codec: Option<Box<dyn ContextCodec<C>>>,
}

impl<S: State, C> MachineParts<S, C> {
    /// Parts with no observers or codec, and the state set derived from the
    /// transitions.
    pub fn new(transitions: Vec<Transition<S, C>>, start_state: S, context: C) -> Self {
        let mut states: Vec<S> = Vec::new();
        for transition in &transitions {
            for state in [&transition.start, &transition.end] {
                if !states.contains(state) {
                    states.push(state.clone());
                }
            }
        }

        Self {
            transitions,
            start_state,
            states,
            context,
            registry: Registry::new(),
            codec: None,
        }
    }
}

/// A running finite state machine.
///
/// Holds the current state and the context, the transition table with its
/// dispatch index, and the middleware/callback registry. The machine is
/// mutated only through [`transition`](Self::transition),
/// [`auto_transition`](Self::auto_transition) and the checkpoint restore
/// functions.
pub struct StateMachine<S: State, C> {
    pub(crate) table: TransitionTable<S, C>,
    pub(crate) start_state: S,
    pub(crate) states: Vec<S>,
    pub(crate) state: S,
    pub(crate) context: C,
    registry: Registry<S, C>,
    pub(crate) codec: Option<Box<dyn ContextCodec<C>>>,
    events_enabled: bool,
}

impl<S: State, C> StateMachine<S, C> {
    /// Create a machine positioned at `parts.start_state`.
    pub fn new(parts: MachineParts<S, C>) -> Self {
        Self {
            table: TransitionTable::new(parts.transitions),
            state: parts.start_state.clone(),
            start_state: parts.start_state,
            states: parts.states,
            context: parts.context,
            registry: parts.registry,
            codec: parts.codec,
            events_enabled: true,
        }
    }

    /// Get current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get current context
    pub fn context(&self) -> &C {
        &self.context
    }

    /// State the machine was built with.
    pub fn start_state(&self) -> &S {
        &self.start_state
    }

    /// Known states in registration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Transition table in registration order.
    pub fn transitions(&self) -> &TransitionTable<S, C> {
        &self.table
    }

    pub fn events_enabled(&self) -> bool {
        self.events_enabled
    }

    /// Resume running middleware, guards, actions and callbacks.
    pub fn enable_events(&mut self) {
        self.events_enabled = true;
    }

    /// Apply transitions as bare state moves.
    ///
    /// The start state is still checked; middleware, guards, actions and
    /// callbacks are skipped. Meant for replaying a known sequence.
    pub fn disable_events(&mut self) {
        self.events_enabled = false;
    }

    /// Fire the transition registered under `name`.
    ///
    /// Runs global middleware, then the transition's middleware, then the
    /// guard stage (start state, then guard predicate). If that pipeline
    /// returns `Ok`, the state moves to the transition's end, and if the
    /// guard stage was actually reached the action and the callbacks run.
    /// A middleware that returns without proceeding therefore still lets the
    /// state move.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::NotFound`] if no transition has this name
    /// - [`TransitionError::StateMismatch`] if the machine is not at the
    ///   transition's start state
    /// - [`TransitionError::ConditionFailed`] if the guard returns false
    /// - whatever a middleware returns
    /// - whatever a callback returns; the remaining callbacks are skipped
    ///
    /// On a middleware or guard error the state is unchanged, though context
    /// changes made by middleware before the failure are kept. A callback
    /// error arrives after the commit: the state has moved and the action
    /// has run.
    pub fn transition(&mut self, name: &str) -> Result<(), TransitionError> {
        let index = self
            .table
            .position(name)
            .ok_or_else(|| TransitionError::NotFound {
                name: name.to_string(),
            })?;
        self.fire(index)
    }

    /// Fire the first transition out of the current state that succeeds.
    ///
    /// Candidates are tried in registration order and any error from a
    /// candidate is discarded before trying the next one, whatever caused
    /// it. Returns whether a candidate succeeded; never fails. A candidate
    /// whose callback failed has already moved the state, so the candidates
    /// after it usually fail the start-state check.
    pub fn auto_transition(&mut self) -> bool {
        let candidates = self.table.positions_from(&self.state).to_vec();

        for index in candidates {
            match self.fire(index) {
                Ok(()) => return true,
                Err(err) => {
                    trace!(
                        candidate = %self.table.at(index).name,
                        error = %err,
                        "Auto transition candidate rejected"
                    );
                }
            }
        }

        debug!(state = self.state.name(), "No applicable auto transition");
        false
    }

    fn fire(&mut self, index: usize) -> Result<(), TransitionError> {
        let Self {
            table,
            state,
            context,
            registry,
            events_enabled,
            ..
        } = self;
        let transition = table.at(index);

        if !*events_enabled {
            transition.ensure_start(state)?;
            debug!(
                transition = %transition.name,
                from = state.name(),
                to = transition.end.name(),
                "Transition applied with events disabled"
            );
            *state = transition.end.clone();
            return Ok(());
        }

        let current: &S = state;
        let guard_stage = |ctx: &C| transition.admit(current, ctx);
        let completed = pipeline::run(
            &registry.global_middlewares,
            registry.middlewares_for(&transition.name),
            &transition.name,
            context,
            &guard_stage,
        )?;

        let from = std::mem::replace(state, transition.end.clone());

        if !completed {
            debug!(
                transition = %transition.name,
                from = from.name(),
                to = state.name(),
                "Middleware stopped the pipeline; state moved without action or callbacks"
            );
            return Ok(());
        }

        debug!(
            transition = %transition.name,
            from = from.name(),
            to = state.name(),
            "Transition committed"
        );

        if let Some(action) = &transition.action {
            action(context);
        }
        registry.notify(&transition.name, state, context)
    }
}

impl<S: State, C: fmt::Debug> fmt::Debug for StateMachine<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("transitions", &self.table.len())
            .field("events_enabled", &self.events_enabled)
            .finish_non_exhaustive()
    }
}
