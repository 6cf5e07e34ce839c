//! Configuration errors.

use crate::core::{EventId, StateId};
use thiserror::Error;

/// A single problem found while validating a machine configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("No states defined")]
    NoStates,

    #[error("State '{state}' is defined more than once")]
    DuplicateState { state: StateId },

    #[error("Initial state '{initial}' is not a configured state")]
    UnknownInitialState { initial: StateId },

    #[error("Transition '{event}' of state '{state}' targets unknown state '{target}'")]
    UnknownTargetState {
        state: StateId,
        event: EventId,
        target: StateId,
    },
}

/// Errors that can occur when loading or building a machine configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("No configuration supplied")]
    Missing,

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
