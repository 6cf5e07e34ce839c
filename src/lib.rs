//! Waypoint: a table-driven finite state machine with undo/redo history
//!
//! A machine is described declaratively: an initial state plus, for every
//! state, a table mapping event names to target states. The engine tracks the
//! active state, applies transitions by name or by event, and keeps a linear
//! history that can be walked back and forth.
//!
//! # Core Concepts
//!
//! - **Configuration**: `MachineConfig`, loaded from JSON, built fluently, or
//!   written with the `fsm_config!` macro; validated eagerly
//! - **Engine**: `StateMachine`, the single mutable owner of the active state
//! - **History**: `StateHistory`, a visited/undone double stack plus a
//!   timestamped journal of applied transitions
//!
//! # Example
//!
//! ```rust
//! use waypoint_fsm::{FsmError, StateMachine};
//!
//! let mut machine = StateMachine::from_json(
//!     r#"{
//!         "initial": "normal",
//!         "states": {
//!             "normal": { "transitions": { "study": "busy" } },
//!             "busy": { "transitions": { "get_hungry": "hungry" } },
//!             "hungry": { "transitions": { "eat": "normal" } }
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! machine.trigger("study").unwrap();
//! assert_eq!(machine.state().unwrap(), "busy");
//!
//! assert!(matches!(
//!     machine.trigger("eat"),
//!     Err(FsmError::InvalidTransition { .. })
//! ));
//!
//! assert!(machine.undo());
//! assert_eq!(machine.state().unwrap(), "normal");
//! assert!(!machine.undo());
//! ```

pub mod config;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use config::{ConfigError, ConfigViolation, MachineConfig, MachineConfigBuilder, StateBuilder};
pub use crate::core::{EventId, StateHistory, StateId, StateTransition, TransitionCause};
pub use engine::{FsmError, StateMachine};
