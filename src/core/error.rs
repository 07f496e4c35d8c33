//! Engine error types.

use thiserror::Error;

/// Errors raised while binding, constructing or firing a machine.
///
/// Failing to find a transition is not an error: see
/// [`FireOutcome`](crate::engine::FireOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("Transition table is empty. Add at least one transition before the sentinel")]
    EmptyTable,

    #[error("Transition {index} targets the sentinel state")]
    SentinelDestination { index: usize },

    #[error("Transition table holds {count} transitions, more than the maximum of {max}")]
    CapacityExceeded { count: usize, max: usize },

    #[error("Allocator refused {size} bytes for a new instance")]
    AllocationFailed { size: usize },

    #[error("Allocator granted memory that cannot hold {size} bytes aligned to {align}")]
    InvalidGrant { size: usize, align: usize },

    #[error("Instance is not bound to a transition table. Call init() first")]
    Unbound,
}
