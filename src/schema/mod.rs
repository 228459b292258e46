//! Structural schema of a machine.
//!
//! A schema is the guard- and action-free shape of the transition table:
//!
//! ```json
//! {"states":["AJAR","CLOSE","OPEN"],"startState":"OPEN",
//!  "transitions":[{"name":"close","start":"AJAR","end":"CLOSE"}]}
//! ```
//!
//! States are written in a fixed order (see [`collation_order`]) and
//! transitions in registration order, so exporting a machine rebuilt from a
//! schema reproduces the same document byte for byte.

use crate::builder::StateMachineBuilder;
use crate::core::State;
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub mod error;

pub use error::SchemaError;

/// Interchange form of a transition table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub states: Vec<String>,
    pub start_state: String,
    pub transitions: Vec<TransitionSchema>,
}

/// A transition without its guard and action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSchema {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl Schema {
    /// Parse a schema document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::InvalidDocument(format!("{}", e)))
    }

    /// Serialize the schema to JSON.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        serde_json::to_string(self).map_err(|e| SchemaError::Serialization(format!("{}", e)))
    }
}

/// Order used for the `states` list of a schema.
///
/// Case-insensitive first, exact bytes as the tie-breaker, which makes it a
/// total order that does not depend on locale or hashing.
pub fn collation_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl<S: State, C> StateMachine<S, C> {
    /// Project the transition table to a [`Schema`].
    pub fn to_schema(&self) -> Schema {
        let mut states: Vec<String> = self.states.iter().map(|s| s.name().to_string()).collect();
        states.sort_by(|a, b| collation_order(a, b));

        Schema {
            states,
            start_state: self.start_state.name().to_string(),
            transitions: self
                .table
                .iter()
                .map(|t| TransitionSchema {
                    name: t.name.clone(),
                    start: t.start.name().to_string(),
                    end: t.end.name().to_string(),
                })
                .collect(),
        }
    }

    /// Serialize [`to_schema`](Self::to_schema) to JSON.
    pub fn to_json_schema(&self) -> Result<String, SchemaError> {
        self.to_schema().to_json()
    }
}

impl<S: State + 'static, C: 'static> StateMachineBuilder<S, C> {
    /// Start a builder from a schema.
    ///
    /// Shorthand for `StateMachineBuilder::new().with_schema(schema, decode)`.
    pub fn from_schema<F>(schema: &Schema, decode: F) -> Result<Self, SchemaError>
    where
        F: Fn(&str) -> Option<S>,
    {
        Self::new().with_schema(schema, decode)
    }

    /// Parse a schema document and [`from_schema`](Self::from_schema) it.
    pub fn from_json_schema<F>(json: &str, decode: F) -> Result<Self, SchemaError>
    where
        F: Fn(&str) -> Option<S>,
    {
        Self::from_schema(&Schema::from_json(json)?, decode)
    }
}

impl<S: State + 'static, C: 'static, M> StateMachineBuilder<S, C, M> {
    /// Add the states, transitions and start state of a schema.
    ///
    /// States and transitions are added in document order, upserting by
    /// name like [`transition`](Self::transition), and the schema's start
    /// state replaces any set before. Guards, actions, observers and the
    /// context are not part of a schema; set them before or after.
    pub fn with_schema<F>(self, schema: &Schema, decode: F) -> Result<Self, SchemaError>
    where
        F: Fn(&str) -> Option<S>,
    {
        let states = schema
            .states
            .iter()
            .map(|name| decode_state(&decode, name))
            .collect::<Result<Vec<S>, _>>()?;
        let transitions = schema
            .transitions
            .iter()
            .map(|t| -> Result<(String, S, S), SchemaError> {
                Ok((
                    t.name.clone(),
                    decode_state(&decode, &t.start)?,
                    decode_state(&decode, &t.end)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let start_state = decode_state(&decode, &schema.start_state)?;

        let builder = states
            .into_iter()
            .fold(self, |builder, state| builder.add_state(state));
        let builder = transitions
            .into_iter()
            .fold(builder, |builder, (name, start, end)| {
                builder.add_transition(name, start, end)
            });
        Ok(builder.initial(start_state))
    }

    /// Parse a schema document and [`with_schema`](Self::with_schema) it.
    pub fn with_json_schema<F>(self, json: &str, decode: F) -> Result<Self, SchemaError>
    where
        F: Fn(&str) -> Option<S>,
    {
        self.with_schema(&Schema::from_json(json)?, decode)
    }
}

/// Decode a state name with the caller's decoder.
pub(crate) fn decode_state<S, F>(decode: &F, value: &str) -> Result<S, SchemaError>
where
    F: Fn(&str) -> Option<S>,
{
    decode(value).ok_or_else(|| SchemaError::UnknownState {
        value: value.to_string(),
    })
}
