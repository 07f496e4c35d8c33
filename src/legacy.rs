//! Integer-signal API for hosts ported from sentinel-table engines.
//!
//! Missing inputs are modelled as `None`, failures collapse to `None` or `0`,
//! and `fire` reports `1` (transitioned), `0` (guards rejected) or `-1` (no
//! transitions for the current state, or no table bound). Tables are imported
//! with [`TransitionTable::from_terminated`].
//!
//! # Example
//!
//! ```rust
//! use polled_fsm::core::{Transition, TransitionTable};
//! use polled_fsm::legacy::{fsm_destroy, fsm_fire, fsm_get_state, fsm_new};
//!
//! let table: TransitionTable<()> = TransitionTable::from_terminated(vec![
//!     Transition::new(0, 1),
//!     Transition::new(1, 0),
//!     Transition::sentinel(),
//! ]);
//!
//! let mut fsm = fsm_new(Some(&table)).unwrap();
//! assert_eq!(fsm_fire(Some(&mut *fsm)), 1);
//! assert_eq!(fsm_get_state(&fsm), 1);
//! fsm_destroy(fsm);
//! ```

use crate::alloc::{Allocator, SystemAllocator};
use crate::core::{StateId, TransitionTable};
use crate::engine::{Fsm, OwnedFsm};

/// Construct an engine-owned instance on the global heap.
pub fn fsm_new<C: Default>(table: Option<&TransitionTable<C>>) -> Option<OwnedFsm<'_, C>> {
    fsm_new_in(table, SystemAllocator)
}

/// Construct an engine-owned instance through `allocator`.
pub fn fsm_new_in<C: Default, A: Allocator>(
    table: Option<&TransitionTable<C>>,
    allocator: A,
) -> Option<OwnedFsm<'_, C, A>> {
    OwnedFsm::new_in(table?, C::default(), allocator).ok()
}

/// Bind caller-owned storage to a table. Returns the transition count, or
/// `0` on failure.
pub fn fsm_init<'t, C>(
    fsm: Option<&mut Fsm<'t, C>>,
    table: Option<&'t TransitionTable<C>>,
) -> usize {
    match (fsm, table) {
        (Some(fsm), Some(table)) => fsm.init(table).unwrap_or(0),
        _ => 0,
    }
}

/// Fire once. Returns `1`, `0` or `-1`.
pub fn fsm_fire<C>(fsm: Option<&mut Fsm<'_, C>>) -> i32 {
    match fsm.map(Fsm::fire) {
        Some(Ok(outcome)) => outcome.code(),
        _ => -1,
    }
}

pub fn fsm_get_state<C>(fsm: &Fsm<'_, C>) -> StateId {
    fsm.state()
}

pub fn fsm_set_state<C>(fsm: &mut Fsm<'_, C>, state: StateId) {
    fsm.set_state(state);
}

/// Release an engine-owned instance.
pub fn fsm_destroy<C, A: Allocator>(fsm: OwnedFsm<'_, C, A>) {
    fsm.destroy();
}
