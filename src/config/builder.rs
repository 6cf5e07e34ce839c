//! Fluent builders for machine configurations.

use crate::config::error::ConfigError;
use crate::config::{MachineConfig, StateDefinition, StateTable};
use crate::core::{EventId, StateId};

/// Builder for one state and its outbound transitions.
pub struct StateBuilder {
    id: StateId,
    definition: StateDefinition,
}

impl StateBuilder {
    /// Start describing state `id`.
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            definition: StateDefinition::default(),
        }
    }

    /// Move to `target` when `event` is triggered in this state.
    ///
    /// Declaring the same event twice keeps the last target.
    pub fn on(mut self, event: impl Into<EventId>, target: impl Into<StateId>) -> Self {
        self.definition
            .transitions
            .insert(event.into(), target.into());
        self
    }

    fn into_entry(self) -> (StateId, StateDefinition) {
        (self.id, self.definition)
    }
}

/// Builder for constructing machine configurations with a fluent API.
///
/// # Example
///
/// ```rust
/// use waypoint_fsm::config::{MachineConfigBuilder, StateBuilder};
///
/// let config = MachineConfigBuilder::new()
///     .initial("locked")
///     .state(StateBuilder::new("locked").on("coin", "unlocked"))
///     .state(StateBuilder::new("unlocked").on("push", "locked"))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.states.len(), 2);
/// ```
#[derive(Default)]
pub struct MachineConfigBuilder {
    initial: Option<StateId>,
    states: StateTable,
}

impl MachineConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<StateId>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Add a state using a builder.
    pub fn state(mut self, builder: StateBuilder) -> Self {
        let (id, definition) = builder.into_entry();
        self.states.insert(id, definition);
        self
    }

    /// Add several states at once.
    pub fn states(mut self, builders: impl IntoIterator<Item = StateBuilder>) -> Self {
        for builder in builders {
            self = self.state(builder);
        }
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<MachineConfig, ConfigError> {
        let initial = self.initial.ok_or(ConfigError::MissingInitialState)?;
        let config = MachineConfig::new(initial, self.states);
        config.validate()?;
        Ok(config)
    }
}
