//! The state machine engine.
//!
//! [`StateMachine`] combines a validated configuration with a
//! [`StateHistory`](crate::core::StateHistory): transitions are plain table
//! lookups, and undo/redo walk the history's double stack.

mod error;
mod machine;

pub use error::FsmError;
pub use machine::StateMachine;
