//! Table-driven state machine with undo/redo.

use crate::config::MachineConfig;
use crate::core::{EventId, StateHistory, StateId, StateTransition, TransitionCause};
use crate::engine::error::FsmError;
use chrono::Utc;
use tracing::{debug, warn};

/// Finite state machine driven by a validated [`MachineConfig`].
///
/// The configuration is fixed at construction. Every forward move (direct
/// jump, event, reset) pushes onto the history and discards pending redo
/// entries; [`undo`](Self::undo) and [`redo`](Self::redo) walk the history
/// without discarding it.
///
/// All mutation goes through `&mut self`. Share a machine across threads by
/// wrapping it in a lock such as `std::sync::Mutex`.
///
/// # Example
///
/// ```rust
/// use waypoint_fsm::{fsm_config, StateMachine};
///
/// let config = fsm_config! {
///     initial: normal,
///     states: {
///         normal => { study: busy },
///         busy => { get_tired: sleeping },
///         sleeping => { get_up: normal },
///     }
/// }
/// .unwrap();
///
/// let mut machine = StateMachine::new(config).unwrap();
/// machine.trigger("study").unwrap();
/// machine.trigger("get_tired").unwrap();
/// assert_eq!(machine.state().unwrap(), "sleeping");
///
/// assert!(machine.undo());
/// assert_eq!(machine.state().unwrap(), "busy");
/// assert!(machine.redo());
/// assert_eq!(machine.state().unwrap(), "sleeping");
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine {
    config: MachineConfig,
    history: StateHistory,
}

impl StateMachine {
    /// Create a machine positioned at the configured initial state.
    ///
    /// The configuration is validated first; see [`MachineConfig::validate`].
    pub fn new(config: MachineConfig) -> Result<Self, FsmError> {
        config.validate()?;
        let history = StateHistory::new(config.initial.clone());
        debug!(
            initial = %config.initial,
            states = config.states.len(),
            "state machine created"
        );
        Ok(Self { config, history })
    }

    /// Parse a JSON configuration and create a machine from it.
    pub fn from_json(json: &str) -> Result<Self, FsmError> {
        Self::new(MachineConfig::from_json(json)?)
    }

    /// Get the active state.
    pub fn state(&self) -> Result<&StateId, FsmError> {
        self.history.current().ok_or(FsmError::NoActiveState)
    }

    /// Jump directly to `state`.
    ///
    /// Re-entering the active state is allowed and still adds a history entry.
    pub fn change_state(&mut self, state: &str) -> Result<(), FsmError> {
        let target = self.resolve_state(state)?;
        self.enter(target, TransitionCause::Direct)
    }

    /// Follow the active state's transition for `event`.
    ///
    /// The active state is left untouched when the event is not handled.
    pub fn trigger(&mut self, event: &str) -> Result<(), FsmError> {
        let current = self.state()?;
        let target = self
            .config
            .state(current.as_str())
            .and_then(|definition| definition.target(event))
            .cloned();

        let Some(target) = target else {
            warn!(state = %current, event, "no transition for event");
            return Err(FsmError::InvalidTransition {
                state: current.clone(),
                event: EventId::from(event),
            });
        };

        self.enter(target, TransitionCause::Event(EventId::from(event)))
    }

    /// Return to the initial state. This is a forward move, not a rewind:
    /// history is kept and the initial state is pushed onto it.
    pub fn reset(&mut self) -> Result<(), FsmError> {
        let target = self.resolve_state(self.config.initial.as_str())?;
        self.enter(target, TransitionCause::Reset)
    }

    /// Configured states in configuration order.
    ///
    /// With `Some(event)`, only states declaring a transition for that event
    /// are returned. Unknown events produce an empty list.
    pub fn states(&self, event: Option<&str>) -> Vec<&StateId> {
        self.config
            .states
            .iter()
            .filter(|(_, definition)| event.map_or(true, |event| definition.handles(event)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Events the active state reacts to, sorted by name.
    pub fn available_events(&self) -> Vec<&EventId> {
        self.history
            .current()
            .and_then(|current| self.config.state(current.as_str()))
            .map(|definition| definition.transitions.keys().collect())
            .unwrap_or_default()
    }

    /// Step back to the previous history entry.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(from) = self.history.current().cloned() else {
            return false;
        };
        let Some(to) = self.history.step_back().cloned() else {
            debug!(state = %from, "nothing to undo");
            return false;
        };
        self.journal(from, to, TransitionCause::Undo);
        true
    }

    /// Replay the most recently undone state.
    ///
    /// Returns `false` when nothing is pending, including after any forward
    /// move since the last undo.
    pub fn redo(&mut self) -> bool {
        let Some(from) = self.history.current().cloned() else {
            return false;
        };
        let Some(to) = self.history.step_forward().cloned() else {
            debug!(state = %from, "nothing to redo");
            return false;
        };
        self.journal(from, to, TransitionCause::Redo);
        true
    }

    /// Forget all history except the active state. Pending redo entries are
    /// dropped too.
    pub fn clear_history(&mut self) {
        self.history.truncate_to_current();
        debug!(state = ?self.history.current(), "history cleared");
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_step_back()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_step_forward()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    fn resolve_state(&self, state: &str) -> Result<StateId, FsmError> {
        match self.config.states.ids().find(|id| *id == state) {
            Some(id) => Ok(id.clone()),
            None => {
                warn!(state, "unknown state requested");
                Err(FsmError::InvalidState {
                    state: StateId::from(state),
                })
            }
        }
    }

    fn enter(&mut self, target: StateId, cause: TransitionCause) -> Result<(), FsmError> {
        let from = self.state()?.clone();
        self.history.push(target.clone());
        self.journal(from, target, cause);
        Ok(())
    }

    fn journal(&mut self, from: StateId, to: StateId, cause: TransitionCause) {
        debug!(from = %from, to = %to, cause = ?cause, "transition applied");
        self.history.record(StateTransition {
            from,
            to,
            cause,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ConfigViolation};

    fn student() -> StateMachine {
        let config = crate::fsm_config! {
            initial: normal,
            states: {
                normal => { study: busy },
                busy => { get_tired: sleeping, get_hungry: hungry },
                hungry => { eat: normal },
                sleeping => { get_hungry: hungry, get_up: normal },
            }
        }
        .unwrap();
        StateMachine::new(config).unwrap()
    }

    fn current(machine: &StateMachine) -> &str {
        machine.state().unwrap().as_str()
    }

    fn path(machine: &StateMachine) -> Vec<&str> {
        machine.history().path().iter().map(StateId::as_str).collect()
    }

    #[test]
    fn new_machine_starts_at_initial() {
        let machine = student();
        assert_eq!(current(&machine), "normal");
        assert_eq!(path(&machine), vec!["normal"]);
        assert!(!machine.can_undo());
        assert!(!machine.can_redo());
    }

    #[test]
    fn missing_config_is_config_error() {
        let result = StateMachine::from_json("null");
        assert!(matches!(
            result,
            Err(FsmError::Config(ConfigError::Missing))
        ));
    }

    #[test]
    fn unknown_initial_state_fails_construction() {
        let result = StateMachine::from_json(r#"{ "initial": "x", "states": { "a": {} } }"#);
        assert_eq!(
            result.err(),
            Some(FsmError::Config(ConfigError::Invalid(vec![
                ConfigViolation::UnknownInitialState {
                    initial: "x".into()
                }
            ])))
        );
    }

    #[test]
    fn change_state_moves_and_records() {
        let mut machine = student();
        machine.change_state("hungry").unwrap();

        assert_eq!(current(&machine), "hungry");
        assert_eq!(path(&machine), vec!["normal", "hungry"]);
        let transition = &machine.history().transitions()[0];
        assert_eq!(transition.from, "normal");
        assert_eq!(transition.to, "hungry");
        assert_eq!(transition.cause, TransitionCause::Direct);
    }

    #[test]
    fn change_state_rejects_unknown_state() {
        let mut machine = student();
        let result = machine.change_state("flying");

        assert_eq!(
            result,
            Err(FsmError::InvalidState {
                state: "flying".into()
            })
        );
        assert_eq!(current(&machine), "normal");
        assert_eq!(path(&machine), vec!["normal"]);
    }

    #[test]
    fn change_state_to_same_state_pushes_duplicate() {
        let mut machine = student();
        machine.change_state("normal").unwrap();
        assert_eq!(path(&machine), vec!["normal", "normal"]);
        assert!(machine.can_undo());
    }

    #[test]
    fn trigger_follows_transition_table() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.trigger("get_hungry").unwrap();

        assert_eq!(current(&machine), "hungry");
        assert_eq!(
            machine.history().transitions()[1].cause,
            TransitionCause::Event("get_hungry".into())
        );
    }

    #[test]
    fn trigger_rejects_unhandled_event() {
        let mut machine = student();
        let result = machine.trigger("get_tired");

        assert_eq!(
            result,
            Err(FsmError::InvalidTransition {
                state: "normal".into(),
                event: "get_tired".into(),
            })
        );
        assert_eq!(current(&machine), "normal");
        assert!(machine.history().transitions().is_empty());
    }

    #[test]
    fn reset_pushes_initial_state() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.trigger("get_tired").unwrap();
        machine.reset().unwrap();

        assert_eq!(current(&machine), "normal");
        assert_eq!(path(&machine), vec!["normal", "busy", "sleeping", "normal"]);
        assert_eq!(
            machine.history().transitions().last().map(|t| &t.cause),
            Some(&TransitionCause::Reset)
        );
    }

    #[test]
    fn states_lists_all_in_config_order() {
        let machine = student();
        let states: Vec<&str> = machine.states(None).into_iter().map(StateId::as_str).collect();
        assert_eq!(states, vec!["normal", "busy", "hungry", "sleeping"]);
    }

    #[test]
    fn states_filters_by_event() {
        let machine = student();
        let states: Vec<&str> = machine
            .states(Some("get_hungry"))
            .into_iter()
            .map(StateId::as_str)
            .collect();

        assert_eq!(states, vec!["busy", "sleeping"]);
        assert!(machine.states(Some("dance")).is_empty());
    }

    #[test]
    fn available_events_follow_active_state() {
        let mut machine = student();
        assert_eq!(machine.available_events(), vec![&EventId::from("study")]);

        machine.trigger("study").unwrap();
        let events: Vec<&str> = machine
            .available_events()
            .into_iter()
            .map(EventId::as_str)
            .collect();
        assert_eq!(events, vec!["get_hungry", "get_tired"]);
    }

    #[test]
    fn undo_returns_to_previous_state() {
        let mut machine = student();
        machine.trigger("study").unwrap();

        assert!(machine.undo());
        assert_eq!(current(&machine), "normal");
        assert_eq!(path(&machine), vec!["normal"]);
        assert!(machine.can_redo());
    }

    #[test]
    fn undo_without_history_is_noop() {
        let mut machine = student();
        assert!(!machine.undo());
        assert_eq!(current(&machine), "normal");
        assert!(!machine.can_redo());
    }

    #[test]
    fn redo_replays_undone_states_in_order() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.trigger("get_tired").unwrap();
        assert!(machine.undo());
        assert!(machine.undo());
        assert_eq!(current(&machine), "normal");

        assert!(machine.redo());
        assert_eq!(current(&machine), "busy");
        assert!(machine.can_redo());

        assert!(machine.redo());
        assert_eq!(current(&machine), "sleeping");
        assert!(!machine.can_redo());
        assert!(!machine.redo());
    }

    #[test]
    fn forward_move_invalidates_redo() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        assert!(machine.undo());

        machine.change_state("hungry").unwrap();
        assert!(!machine.redo());
        assert_eq!(current(&machine), "hungry");
    }

    #[test]
    fn reset_invalidates_redo() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.trigger("get_tired").unwrap();
        assert!(machine.undo());

        machine.reset().unwrap();
        assert!(!machine.redo());
    }

    #[test]
    fn redo_without_undo_is_noop() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        assert!(!machine.redo());
        assert_eq!(current(&machine), "busy");
    }

    #[test]
    fn undo_redo_are_journaled() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.undo();
        machine.redo();

        let causes: Vec<&TransitionCause> = machine
            .history()
            .transitions()
            .iter()
            .map(|t| &t.cause)
            .collect();
        assert_eq!(
            causes,
            vec![
                &TransitionCause::Event("study".into()),
                &TransitionCause::Undo,
                &TransitionCause::Redo,
            ]
        );
    }

    #[test]
    fn clear_history_keeps_only_active_state() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.trigger("get_hungry").unwrap();
        machine.clear_history();

        assert_eq!(current(&machine), "hungry");
        assert_eq!(path(&machine), vec!["hungry"]);
        assert!(!machine.undo());
    }

    #[test]
    fn clear_history_drops_pending_redo() {
        let mut machine = student();
        machine.trigger("study").unwrap();
        machine.trigger("get_hungry").unwrap();
        assert!(machine.undo());

        machine.clear_history();
        assert!(!machine.can_redo());
        assert!(!machine.redo());
        assert_eq!(current(&machine), "busy");
    }

    #[test]
    fn machine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateMachine>();
    }
}
