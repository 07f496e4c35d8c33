//! Build errors for the transition builder.

use thiserror::Error;

/// Errors that can occur when building transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Transition origin state not specified. Call .from(state)")]
    MissingOrigin,

    #[error("Transition destination state not specified. Call .to(state)")]
    MissingDestination,

    #[error("The sentinel state cannot be used as a transition {role}")]
    SentinelState { role: &'static str },
}
