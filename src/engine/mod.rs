//! The polled transition engine.
//!
//! # Key Concepts
//!
//! - **Fsm**: caller-owned instance, bound to a borrowed table
//! - **OwnedFsm**: engine-owned instance created through an allocator
//! - **FireOutcome**: what a single `fire` call did
//!
//! The host calls `fire` on every tick. Each call scans the table once,
//! fires at most one transition and runs at most one action.

mod machine;
mod owned;

pub use machine::{FireOutcome, Fsm};
pub use owned::OwnedFsm;
