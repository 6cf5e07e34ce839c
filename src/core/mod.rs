//! Core identifier and history types.
//!
//! This module contains the building blocks the engine is made of:
//! - State and event identifiers
//! - The visited/undone double stack used for undo and redo
//! - The journal of applied transitions

mod history;
mod state;

pub use history::{StateHistory, StateTransition, TransitionCause};
pub use state::{EventId, StateId};
