//! Build errors for the state machine builder.

use thiserror::Error;

/// A single reason the builder cannot produce a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildIssue {
    #[error("Context not specified. Call .context(value) before .build()")]
    MissingContext,

    #[error("Start state not specified. Call .initial(state) before .build()")]
    MissingStartState,

    #[error("Transition '{name}' not found. Add it before setting its guard or action")]
    UnknownTransition { name: String },
}

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Every problem found, in the order the checks ran.
    #[error("State machine builder is incomplete: {}", describe(.issues))]
    Incomplete { issues: Vec<BuildIssue> },
}

impl BuildError {
    pub fn issues(&self) -> &[BuildIssue] {
        match self {
            Self::Incomplete { issues } => issues,
        }
    }
}

fn describe(issues: &[BuildIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_every_issue() {
        let err = BuildError::Incomplete {
            issues: vec![
                BuildIssue::MissingContext,
                BuildIssue::UnknownTransition {
                    name: "open".to_string(),
                },
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("State machine builder is incomplete: Context not specified"));
        assert!(message.contains("; Transition 'open' not found"));
        assert_eq!(err.issues().len(), 2);
    }
}
