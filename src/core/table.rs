//! Transition table and its dispatch index.
//!
//! The table keeps transitions in registration order. Two lookups are
//! derived once at construction and never change afterwards: by name for
//! `transition`, and by start state for `auto_transition`.

use crate::core::{State, Transition};
use std::collections::HashMap;

/// Immutable set of named transitions plus lookup structures.
pub struct TransitionTable<S: State, C> {
    transitions: Vec<Transition<S, C>>,
    by_name: HashMap<String, usize>,
    by_start: HashMap<S, Vec<usize>>,
}

impl<S: State, C> TransitionTable<S, C> {
    /// Build the table and its index.
    ///
    /// A transition whose name was already seen replaces the earlier entry in
    /// place, so the registration position of a name is the position of its
    /// first occurrence.
    pub fn new(transitions: impl IntoIterator<Item = Transition<S, C>>) -> Self {
        let mut ordered: Vec<Transition<S, C>> = Vec::new();
        let mut by_name = HashMap::new();

        for transition in transitions {
            match by_name.get(&transition.name) {
                Some(&index) => ordered[index] = transition,
                None => {
                    by_name.insert(transition.name.clone(), ordered.len());
                    ordered.push(transition);
                }
            }
        }

        let mut by_start: HashMap<S, Vec<usize>> = HashMap::new();
        for (index, transition) in ordered.iter().enumerate() {
            by_start
                .entry(transition.start.clone())
                .or_default()
                .push(index);
        }

        Self {
            transitions: ordered,
            by_name,
            by_start,
        }
    }

    /// Look up a transition by name.
    pub fn get(&self, name: &str) -> Option<&Transition<S, C>> {
        self.position(name).map(|index| &self.transitions[index])
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn at(&self, index: usize) -> &Transition<S, C> {
        &self.transitions[index]
    }

    /// Positions of the transitions leaving `state`, in registration order.
    pub(crate) fn positions_from(&self, state: &S) -> &[usize] {
        self.by_start.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Transitions leaving `state`, in registration order.
    pub fn from_state<'a>(&'a self, state: &S) -> impl Iterator<Item = &'a Transition<S, C>> + 'a {
        self.positions_from(state)
            .iter()
            .map(move |&index| &self.transitions[index])
    }

    /// All transitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, C>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
