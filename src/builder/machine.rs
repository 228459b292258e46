//! Builder for constructing state machines.

use crate::builder::error::{BuildError, BuildIssue};
use crate::checkpoint::ContextCodec;
use crate::core::{Guard, State, Transition, TransitionError};
use crate::machine::{GlobalNext, MachineParts, Next, Registry, StateMachine};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Turns the accumulated parts into the machine returned by `build()`.
pub type Factory<S, C, M> = Box<dyn FnOnce(MachineParts<S, C>) -> M>;

/// What `build()` does when no start state was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartStatePolicy {
    /// Use the start state of the first registered transition.
    #[default]
    FirstTransition,

    /// Fail with [`BuildIssue::MissingStartState`].
    Explicit,
}

/// Builder for constructing state machines with a fluent API.
///
/// Transitions are keyed by name: adding a name twice replaces the earlier
/// definition but keeps its position. The output type is a plain
/// [`StateMachine`] unless a different [`factory`](Self::factory) is set.
pub struct StateMachineBuilder<S: State + 'static, C: 'static, M = StateMachine<S, C>> {
    transitions: Vec<Transition<S, C>>,
    positions: HashMap<String, usize>,
    initial: Option<S>,
    states: Vec<S>,
    context: Option<C>,
    registry: Registry<S, C>,
    codec: Option<Box<dyn ContextCodec<C>>>,
    factory: Factory<S, C, M>,
    start_policy: StartStatePolicy,
    issues: Vec<BuildIssue>,
}

impl<S: State + 'static, C: 'static> StateMachineBuilder<S, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            positions: HashMap::new(),
            initial: None,
            states: Vec::new(),
            context: None,
            registry: Registry::new(),
            codec: None,
            factory: Box::new(StateMachine::new),
            start_policy: StartStatePolicy::default(),
            issues: Vec::new(),
        }
    }
}

impl<S: State + 'static, C: 'static> Default for StateMachineBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State + 'static, C: 'static, M> StateMachineBuilder<S, C, M> {
    /// Add an unguarded transition without an action.
    ///
    /// Both states are added to the state set.
    pub fn add_transition(self, name: impl Into<String>, start: S, end: S) -> Self {
        self.transition(Transition::new(name, start, end))
    }

    /// Add a fully specified transition, replacing any with the same name.
    pub fn transition(mut self, transition: Transition<S, C>) -> Self {
        self = self.add_state(transition.start.clone());
        self = self.add_state(transition.end.clone());

        match self.positions.get(&transition.name) {
            Some(&index) => self.transitions[index] = transition,
            None => {
                self.positions
                    .insert(transition.name.clone(), self.transitions.len());
                self.transitions.push(transition);
            }
        }
        self
    }

    /// Add a state that no transition mentions yet.
    pub fn add_state(mut self, state: S) -> Self {
        if !self.states.contains(&state) {
            self.states.push(state);
        }
        self
    }

    /// Set the guard of an already added transition.
    ///
    /// An unknown name is reported by `build()`.
    pub fn set_transition_guard<F>(mut self, name: &str, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        match self.positions.get(name) {
            Some(&index) => self.transitions[index].guard = Some(Guard::new(predicate)),
            None => self.issues.push(BuildIssue::UnknownTransition {
                name: name.to_string(),
            }),
        }
        self
    }

    /// Set the action of an already added transition.
    ///
    /// An unknown name is reported by `build()`.
    pub fn set_transition_action<F>(mut self, name: &str, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        match self.positions.get(name) {
            Some(&index) => self.transitions[index].action = Some(Box::new(action)),
            None => self.issues.push(BuildIssue::UnknownTransition {
                name: name.to_string(),
            }),
        }
        self
    }

    /// Add middleware for the transition called `name`.
    pub fn middleware<F>(mut self, name: impl Into<String>, middleware: F) -> Self
    where
        F: Fn(&mut C, Next<'_, C>) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.registry.add_middleware(name, Box::new(middleware));
        self
    }

    /// Add middleware that runs before every transition.
    pub fn global_middleware<F>(mut self, middleware: F) -> Self
    where
        F: Fn(&str, &mut C, GlobalNext<'_, C>) -> Result<(), TransitionError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.add_global_middleware(Box::new(middleware));
        self
    }

    /// Observe the transition called `name`.
    ///
    /// Callbacks run after the state has moved. An `Err` skips the remaining
    /// callbacks and is returned by `transition`.
    pub fn on_transition<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&C) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.registry
            .add_transition_callback(name, Box::new(callback));
        self
    }

    /// Observe every transition.
    pub fn on_any_transition<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &C) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.registry
            .add_global_transition_callback(Box::new(callback));
        self
    }

    /// Observe entering `state`.
    pub fn on_state<F>(mut self, state: S, callback: F) -> Self
    where
        F: Fn(&C) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.registry.add_state_callback(state, Box::new(callback));
        self
    }

    /// Observe entering any state.
    pub fn on_any_state<F>(mut self, callback: F) -> Self
    where
        F: Fn(&S, &C) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.registry.add_global_state_callback(Box::new(callback));
        self
    }

    /// Set the initial state.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the context (required).
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the codec used by checkpoints.
    pub fn context_codec(mut self, codec: impl ContextCodec<C> + 'static) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Choose what happens when no initial state was set.
    pub fn start_state_policy(mut self, policy: StartStatePolicy) -> Self {
        self.start_policy = policy;
        self
    }

    /// Replace the factory, changing what `build()` returns.
    ///
    /// This is how a typed facade around [`StateMachine`] is produced by the
    /// builder.
    pub fn factory<M2, F>(self, factory: F) -> StateMachineBuilder<S, C, M2>
    where
        F: FnOnce(MachineParts<S, C>) -> M2 + 'static,
    {
        StateMachineBuilder {
            transitions: self.transitions,
            positions: self.positions,
            initial: self.initial,
            states: self.states,
            context: self.context,
            registry: self.registry,
            codec: self.codec,
            factory: Box::new(factory),
            start_policy: self.start_policy,
            issues: self.issues,
        }
    }

    /// Build the state machine.
    ///
    /// # Errors
    ///
    /// [`BuildError::Incomplete`] listing every problem found: missing
    /// context, missing start state (only under
    /// [`StartStatePolicy::Explicit`] or with no transitions), and guards or
    /// actions set on names that were never added.
    pub fn build(mut self) -> Result<M, BuildError> {
        let initial = self.resolve_initial();

        if let Validation::Failure(issues) = self.validate(initial.as_ref()) {
            return Err(BuildError::Incomplete {
                issues: issues.iter().cloned().collect(),
            });
        }

        let context = self.context.ok_or_else(|| BuildError::Incomplete {
            issues: vec![BuildIssue::MissingContext],
        })?;
        let start_state = initial.ok_or_else(|| BuildError::Incomplete {
            issues: vec![BuildIssue::MissingStartState],
        })?;

        let parts = MachineParts {
            transitions: self.transitions,
            start_state,
            states: self.states,
            context,
            registry: self.registry,
            codec: self.codec,
        };
        Ok((self.factory)(parts))
    }

    fn resolve_initial(&mut self) -> Option<S> {
        match (self.initial.take(), self.start_policy) {
            (Some(state), _) => Some(state),
            (None, StartStatePolicy::FirstTransition) => {
                let inferred = self.transitions.first().map(|t| t.start.clone());
                if let Some(state) = &inferred {
                    debug!(
                        state = state.name(),
                        "Start state inferred from first transition"
                    );
                }
                inferred
            }
            (None, StartStatePolicy::Explicit) => None,
        }
    }

    /// Accumulate every configuration problem instead of stopping at the first.
    fn validate(&self, initial: Option<&S>) -> Validation<(), NonEmptyVec<BuildIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildIssue>>> = Vec::new();

        checks.push(if self.context.is_some() {
            Validation::success(())
        } else {
            Validation::fail(BuildIssue::MissingContext)
        });

        checks.push(if initial.is_some() {
            Validation::success(())
        } else {
            Validation::fail(BuildIssue::MissingStartState)
        });

        for issue in &self.issues {
            checks.push(Validation::fail(issue.clone()));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Light {
        Red,
        Green,
        Yellow,
    }

    impl State for Light {
        fn name(&self) -> &str {
            match self {
                Self::Red => "Red",
                Self::Green => "Green",
                Self::Yellow => "Yellow",
            }
        }
    }

    fn lights() -> StateMachineBuilder<Light, u32> {
        StateMachineBuilder::new()
            .add_transition("go", Light::Red, Light::Green)
            .add_transition("slow", Light::Green, Light::Yellow)
            .add_transition("stop", Light::Yellow, Light::Red)
    }

    #[test]
    fn builder_requires_context() {
        let result = lights().initial(Light::Red).build();

        let err = result.unwrap_err();
        assert_eq!(err.issues(), &[BuildIssue::MissingContext]);
    }

    #[test]
    fn builder_infers_start_state_from_first_transition() {
        let machine = lights().context(0).build().unwrap();

        assert_eq!(machine.state(), &Light::Red);
    }

    #[test]
    fn explicit_policy_requires_start_state() {
        let result = lights()
            .context(0)
            .start_state_policy(StartStatePolicy::Explicit)
            .build();

        assert_eq!(
            result.unwrap_err().issues(),
            &[BuildIssue::MissingStartState]
        );
    }

    #[test]
    fn empty_builder_reports_all_issues() {
        let result = StateMachineBuilder::<Light, u32>::new()
            .set_transition_guard("go", |_| true)
            .build();

        assert_eq!(
            result.unwrap_err().issues(),
            &[
                BuildIssue::MissingContext,
                BuildIssue::MissingStartState,
                BuildIssue::UnknownTransition {
                    name: "go".to_string()
                },
            ]
        );
    }

    #[test]
    fn add_transition_upserts_by_name() {
        let machine = lights()
            .add_transition("go", Light::Red, Light::Yellow)
            .context(0)
            .build()
            .unwrap();

        assert_eq!(machine.transitions().len(), 3);
        let names: Vec<&str> = machine
            .transitions()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["go", "slow", "stop"]);
        assert_eq!(
            machine.transitions().get("go").map(|t| t.end),
            Some(Light::Yellow)
        );
    }

    #[test]
    fn transitions_register_their_states() {
        let machine = StateMachineBuilder::<Light, u32>::new()
            .add_state(Light::Yellow)
            .add_transition("go", Light::Red, Light::Green)
            .context(0)
            .build()
            .unwrap();

        assert_eq!(machine.states(), &[Light::Yellow, Light::Red, Light::Green]);
    }

    #[test]
    fn guard_and_action_can_be_set_after_the_fact() {
        let mut machine = lights()
            .set_transition_guard("go", |ticks: &u32| *ticks >= 3)
            .set_transition_action("go", |ticks: &mut u32| *ticks = 0)
            .initial(Light::Red)
            .context(2)
            .build()
            .unwrap();

        assert!(machine.transition("go").is_err());

        let mut ready = lights()
            .set_transition_guard("go", |ticks: &u32| *ticks >= 3)
            .set_transition_action("go", |ticks: &mut u32| *ticks = 0)
            .context(3)
            .build()
            .unwrap();
        ready.transition("go").unwrap();

        assert_eq!(ready.state(), &Light::Green);
        assert_eq!(ready.context(), &0);
        assert_eq!(machine.state(), &Light::Red);
    }

    #[test]
    fn registered_observers_reach_the_machine() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c1 = Arc::clone(&calls);
        let c2 = Arc::clone(&calls);
        let mut machine = lights()
            .middleware("go", |ticks, next| {
                *ticks += 1;
                next.proceed(ticks)
            })
            .global_middleware(|name, ticks, next| next.proceed(name, ticks))
            .on_transition("go", move |_| {
                c1.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .on_state(Light::Green, move |_| {
                c2.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .context(0)
            .build()
            .unwrap();

        machine.transition("go").unwrap();

        assert_eq!(machine.context(), &1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn factory_changes_output_type() {
        struct Wrapped(StateMachine<Light, u32>);

        let wrapped = lights()
            .context(7)
            .factory(|parts| Wrapped(StateMachine::new(parts)))
            .build()
            .unwrap();

        assert_eq!(wrapped.0.context(), &7);
    }
}
