//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, StateId, Transition, SENTINEL};
use crate::engine::Fsm;

/// Builder for transitions with a fluent API.
///
/// Unlike [`Transition::new`], `build` rejects rows that use the sentinel as
/// an origin or destination, so a hand-written table cannot end early by
/// accident.
pub struct TransitionBuilder<C> {
    origin: Option<StateId>,
    destination: Option<StateId>,
    guard: Option<Box<dyn Guard<C>>>,
    action: Option<Box<dyn Action<C>>>,
}

impl<C> TransitionBuilder<C> {
    pub fn new() -> Self {
        Self {
            origin: None,
            destination: None,
            guard: None,
            action: None,
        }
    }

    /// Set the origin state (required).
    pub fn from(mut self, state: StateId) -> Self {
        self.origin = Some(state);
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: StateId) -> Self {
        self.destination = Some(state);
        self
    }

    /// Add a guard (optional).
    pub fn guard<G>(mut self, guard: G) -> Self
    where
        G: Guard<C> + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&Fsm<'_, C>) -> bool + 'static,
    {
        self.guard(predicate)
    }

    /// Add an action (optional).
    pub fn action<A>(mut self, action: A) -> Self
    where
        A: Action<C> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Add an action using a closure (optional).
    pub fn then<F>(self, effect: F) -> Self
    where
        F: Fn(&mut Fsm<'_, C>) + 'static,
    {
        self.action(effect)
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<C>, BuildError> {
        let origin = self.origin.ok_or(BuildError::MissingOrigin)?;
        let destination = self.destination.ok_or(BuildError::MissingDestination)?;

        if origin == SENTINEL {
            return Err(BuildError::SentinelState { role: "origin" });
        }
        if destination == SENTINEL {
            return Err(BuildError::SentinelState {
                role: "destination",
            });
        }

        Ok(Transition {
            origin,
            guard: self.guard,
            destination,
            action: self.action,
        })
    }
}

impl<C> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
