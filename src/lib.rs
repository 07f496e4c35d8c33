//! polled-fsm: a table-driven finite state machine for embedding in hosts.
//!
//! A host object owns a transition table and one or more machine instances,
//! and drives each instance by calling `fire` on every tick. A call scans the
//! table once, fires the first matching transition whose guard holds, and
//! runs its action after the state change. Nothing is queued, timed or run
//! concurrently.
//!
//! # Core Concepts
//!
//! - **Transition tables**: ordered rows of origin, guard, destination, action
//! - **Guards and actions**: capabilities receiving the instance, and through
//!   it the host context
//! - **Instances**: caller-owned [`Fsm`] or engine-owned [`OwnedFsm`] created
//!   through a pluggable [`Allocator`](alloc::Allocator)
//!
//! # Example
//!
//! ```rust
//! use polled_fsm::{FireOutcome, Fsm, Transition, TransitionTable};
//!
//! #[derive(Default)]
//! struct Heater {
//!     temperature: i32,
//!     switches: u32,
//! }
//!
//! const OFF: i32 = 0;
//! const ON: i32 = 1;
//!
//! let table = TransitionTable::new()
//!     .with(
//!         Transition::new(OFF, ON)
//!             .when(|fsm: &Fsm<'_, Heater>| fsm.context().temperature < 18)
//!             .then(|fsm: &mut Fsm<'_, Heater>| fsm.context_mut().switches += 1),
//!     )
//!     .with(
//!         Transition::new(ON, OFF)
//!             .when(|fsm: &Fsm<'_, Heater>| fsm.context().temperature > 22),
//!     );
//!
//! let mut heater = Fsm::bind(&table, Heater { temperature: 15, switches: 0 }).unwrap();
//!
//! assert!(heater.fire().unwrap().transitioned());
//! assert_eq!(heater.state(), ON);
//!
//! // Still cold enough: the ON -> OFF guard rejects.
//! assert_eq!(heater.fire().unwrap(), FireOutcome::Blocked { state: ON, candidates: 1 });
//! ```

pub mod alloc;
pub mod builder;
pub mod core;
pub mod engine;
pub mod legacy;

// Re-export commonly used types
pub use self::core::{
    Action, FsmError, Guard, StateId, Transition, TransitionTable, MAX_TRANSITIONS, SENTINEL,
};
pub use self::engine::{FireOutcome, Fsm, OwnedFsm};
