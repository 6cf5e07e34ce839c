//! Declarative machine configuration.
//!
//! A configuration names the initial state and, for every state, the table
//! of events it reacts to. It can be loaded from JSON, assembled with
//! [`MachineConfigBuilder`], or written inline with [`fsm_config!`](crate::fsm_config).
//!
//! ```json
//! {
//!   "initial": "normal",
//!   "states": {
//!     "normal": { "transitions": { "study": "busy" } },
//!     "busy":   { "transitions": { "get_tired": "sleeping" } },
//!     "sleeping": {}
//!   }
//! }
//! ```

pub mod builder;
pub mod error;
pub mod macros;

pub use builder::{MachineConfigBuilder, StateBuilder};
pub use error::{ConfigError, ConfigViolation};

use crate::core::{EventId, StateId};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::warn;

/// Outbound transitions of a single state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    /// Event name -> target state
    #[serde(default)]
    pub transitions: BTreeMap<EventId, StateId>,
}

impl StateDefinition {
    /// Target of `event`, if this state declares it.
    pub fn target(&self, event: &str) -> Option<&StateId> {
        self.transitions.get(event)
    }

    pub fn handles(&self, event: &str) -> bool {
        self.transitions.contains_key(event)
    }
}

/// States in configuration order.
///
/// Serialized as a map from state id to definition. Entry order follows the
/// source document, and duplicate ids are kept so validation can report them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateTable {
    entries: Vec<(StateId, StateDefinition)>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state definition.
    pub fn insert(&mut self, id: impl Into<StateId>, definition: StateDefinition) {
        self.entries.push((id.into(), definition));
    }

    /// Definition of state `id`. The first entry wins for duplicated ids.
    pub fn get(&self, id: &str) -> Option<&StateDefinition> {
        self.entries
            .iter()
            .find(|(state, _)| state == id)
            .map(|(_, definition)| definition)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// State ids in configuration order.
    pub fn ids(&self) -> impl Iterator<Item = &StateId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateId, &StateDefinition)> {
        self.entries.iter().map(|(id, definition)| (id, definition))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StateTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for StateTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = StateTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of state ids to state definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StateTable, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<StateId, StateDefinition>()? {
                    entries.push(entry);
                }
                Ok(StateTable { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Complete machine definition: the initial state plus every state's
/// transition table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub initial: StateId,
    pub states: StateTable,
}

impl MachineConfig {
    pub fn new(initial: impl Into<StateId>, states: StateTable) -> Self {
        Self {
            initial: initial.into(),
            states,
        }
    }

    /// Parse a configuration from JSON.
    ///
    /// A `null` (or blank) document means no configuration was supplied and
    /// yields [`ConfigError::Missing`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use waypoint_fsm::config::{ConfigError, MachineConfig};
    ///
    /// let config = MachineConfig::from_json(
    ///     r#"{ "initial": "off", "states": { "off": { "transitions": { "toggle": "on" } }, "on": {} } }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(config.initial, "off");
    ///
    /// assert_eq!(MachineConfig::from_json("null"), Err(ConfigError::Missing));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Err(ConfigError::Missing);
        }
        let config: Option<MachineConfig> =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.ok_or(ConfigError::Missing)
    }

    /// Serialize the configuration back to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Definition of state `id`.
    pub fn state(&self, id: &str) -> Option<&StateDefinition> {
        self.states.get(id)
    }

    /// Check the configuration, collecting every violation rather than
    /// stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        if self.states.is_empty() {
            checks.push(Validation::fail(ConfigViolation::NoStates));
        }

        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        for id in self.states.ids() {
            if !seen.insert(id) && reported.insert(id) {
                checks.push(Validation::fail(ConfigViolation::DuplicateState {
                    state: id.clone(),
                }));
            }
        }

        let initial_check = if self.states.contains(self.initial.as_str()) {
            Validation::success(())
        } else {
            Validation::fail(ConfigViolation::UnknownInitialState {
                initial: self.initial.clone(),
            })
        };
        checks.push(initial_check);

        for (state, definition) in self.states.iter() {
            for (event, target) in &definition.transitions {
                if !self.states.contains(target.as_str()) {
                    checks.push(Validation::fail(ConfigViolation::UnknownTargetState {
                        state: state.clone(),
                        event: event.clone(),
                        target: target.clone(),
                    }));
                }
            }
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => {
                let violations: Vec<ConfigViolation> = errors.iter().cloned().collect();
                warn!(
                    initial = %self.initial,
                    violations = violations.len(),
                    "rejected machine configuration"
                );
                Err(ConfigError::Invalid(violations))
            }
        }
    }
}
