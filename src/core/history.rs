//! State history tracking with undo/redo support.
//!
//! History is kept as two stacks: the states visited so far (whose top is
//! the active state) and the states stepped back over, which are the redo
//! candidates. A journal of applied transitions is kept alongside.

use super::state::{EventId, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What caused a transition to be applied.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum TransitionCause {
    /// Direct jump requested by the caller
    Direct,
    /// Lookup of an event in the active state's transition table
    Event(EventId),
    /// Return to the initial state
    Reset,
    /// Step back through history
    Undo,
    /// Replay of a previously undone state
    Redo,
}

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use waypoint_fsm::core::{StateTransition, TransitionCause};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "idle".into(),
///     to: "running".into(),
///     cause: TransitionCause::Event("start".into()),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, "running");
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: StateId,
    /// The state being transitioned to
    pub to: StateId,
    /// Why the transition happened
    pub cause: TransitionCause,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Visited states, redo candidates and the transition journal.
///
/// The visited stack is seeded with a state on construction and is never
/// emptied by any operation on this type.
///
/// # Example
///
/// ```rust
/// use waypoint_fsm::core::StateHistory;
///
/// let mut history = StateHistory::new("a");
/// history.push("b".into());
/// history.push("c".into());
///
/// assert_eq!(history.step_back().map(|s| s.as_str()), Some("b"));
/// assert!(history.can_step_forward());
/// assert_eq!(history.step_forward().map(|s| s.as_str()), Some("c"));
/// assert_eq!(history.path().len(), 3);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    visited: Vec<StateId>,
    undone: Vec<StateId>,
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    /// Create a history positioned at `initial`.
    pub fn new(initial: impl Into<StateId>) -> Self {
        Self {
            visited: vec![initial.into()],
            undone: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// The active state, i.e. the top of the visited stack.
    pub fn current(&self) -> Option<&StateId> {
        self.visited.last()
    }

    /// States visited so far, oldest first.
    pub fn path(&self) -> &[StateId] {
        &self.visited
    }

    /// States available for redo, the next one to replay last.
    pub fn redo_stack(&self) -> &[StateId] {
        &self.undone
    }

    /// Move forward to `state`. Pending redo entries are discarded.
    pub fn push(&mut self, state: StateId) {
        self.undone.clear();
        self.visited.push(state);
    }

    /// Step back one entry, returning the new active state.
    ///
    /// Returns `None` when only one entry is left.
    pub fn step_back(&mut self) -> Option<&StateId> {
        if !self.can_step_back() {
            return None;
        }
        let undone = self.visited.pop()?;
        self.undone.push(undone);
        self.visited.last()
    }

    /// Replay the most recently undone entry, returning it.
    pub fn step_forward(&mut self) -> Option<&StateId> {
        let next = self.undone.pop()?;
        self.visited.push(next);
        self.visited.last()
    }

    pub fn can_step_back(&self) -> bool {
        self.visited.len() > 1
    }

    pub fn can_step_forward(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Forget everything except the active state.
    ///
    /// Redo entries and the transition journal are dropped as well.
    pub fn truncate_to_current(&mut self) {
        let keep = self.visited.len().saturating_sub(1);
        self.visited.drain(..keep);
        self.undone.clear();
        self.transitions.clear();
    }

    /// Append a transition to the journal.
    pub fn record(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
    }

    /// All journaled transitions in the order they were applied.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Time between the first and last journaled transition.
    ///
    /// Returns `None` if nothing has been journaled.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
