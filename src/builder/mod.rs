//! Builder API for ergonomic transition table construction.
//!
//! This module provides a fluent builder, shorthand constructors and the
//! [`transition_table!`](crate::transition_table) macro for declaring tables
//! with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::{StateId, Transition};
use crate::engine::Fsm;

/// Create an unconditional transition without an action.
///
/// # Example
///
/// ```
/// use polled_fsm::builder::simple_transition;
/// use polled_fsm::core::TransitionTable;
///
/// let table: TransitionTable<()> = TransitionTable::new()
///     .with(simple_transition(0, 1))
///     .with(simple_transition(1, 0));
///
/// assert_eq!(table.len(), 2);
/// ```
pub fn simple_transition<C>(from: StateId, to: StateId) -> Transition<C> {
    Transition::new(from, to)
}

/// Create a transition that only fires while `guard` holds.
///
/// # Example
///
/// ```
/// use polled_fsm::builder::guarded_transition;
/// use polled_fsm::core::TransitionTable;
/// use polled_fsm::engine::Fsm;
///
/// struct Sensor {
///     level: u8,
/// }
///
/// let table = TransitionTable::new().with(guarded_transition(0, 1, |fsm: &Fsm<'_, Sensor>| {
///     fsm.context().level > 200
/// }));
///
/// let mut fsm = Fsm::bind(&table, Sensor { level: 12 }).unwrap();
/// assert!(!fsm.fire().unwrap().transitioned());
/// ```
pub fn guarded_transition<C, F>(from: StateId, to: StateId, guard: F) -> Transition<C>
where
    F: Fn(&Fsm<'_, C>) -> bool + 'static,
{
    Transition::new(from, to).when(guard)
}
