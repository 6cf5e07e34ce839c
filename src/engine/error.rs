//! Engine error types.

use crate::config::ConfigError;
use crate::core::{EventId, StateId};
use thiserror::Error;

/// Errors returned by [`StateMachine`](crate::engine::StateMachine) operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    /// Construction failed because the configuration is absent or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The machine has no active state
    #[error("No active state")]
    NoActiveState,

    /// Requested state is not part of the configuration
    #[error("State '{state}' is not a configured state")]
    InvalidState { state: StateId },

    /// Active state has no transition for the event
    #[error("State '{state}' has no transition for event '{event}'")]
    InvalidTransition { state: StateId, event: EventId },
}
