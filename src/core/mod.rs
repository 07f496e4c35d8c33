//! Transition model shared by every machine.
//!
//! This module contains the data the engine evaluates:
//! - State ids and the end-of-table sentinel
//! - `Guard` and `Action` capabilities attached to transitions
//! - Transition tables and their validation
//!
//! Nothing here owns an instance; tables are borrowed by the engine.

mod error;
mod table;
mod transition;

pub use error::FsmError;
pub use table::{TransitionInfo, TransitionTable, MAX_TRANSITIONS};
pub use transition::{Action, Guard, StateId, Transition, SENTINEL};
