//! Transitions and the guard/action capabilities they carry.
//!
//! A transition is a single row of a transition table: when the machine is in
//! `origin` and the guard holds, the machine moves to `destination` and then
//! runs the action.

use crate::engine::Fsm;
use std::fmt;

/// Identifier of a state in a transition table.
pub type StateId = i32;

/// Reserved state id marking the end of a sentinel-terminated table.
///
/// No live transition may use it as a destination.
pub const SENTINEL: StateId = -1;

/// Predicate deciding whether a matching transition may fire.
///
/// Guards receive the whole instance, so they can inspect both the current
/// state and the host context embedded in it. Any `Fn(&Fsm<'_, C>) -> bool`
/// is a guard.
///
/// # Example
///
/// ```rust
/// use polled_fsm::core::{Guard, Transition, TransitionTable};
/// use polled_fsm::engine::Fsm;
///
/// struct Door {
///     unlocked: bool,
/// }
///
/// struct IsUnlocked;
///
/// impl Guard<Door> for IsUnlocked {
///     fn check(&self, fsm: &Fsm<'_, Door>) -> bool {
///         fsm.context().unlocked
///     }
/// }
///
/// let table = TransitionTable::new().with(Transition::new(0, 1).guard(IsUnlocked));
/// let fsm = Fsm::bind(&table, Door { unlocked: true }).unwrap();
///
/// assert!(IsUnlocked.check(&fsm));
/// ```
pub trait Guard<C> {
    /// Evaluate the guard against the instance being fired.
    fn check(&self, fsm: &Fsm<'_, C>) -> bool;
}

impl<C, F> Guard<C> for F
where
    F: Fn(&Fsm<'_, C>) -> bool,
{
    fn check(&self, fsm: &Fsm<'_, C>) -> bool {
        self(fsm)
    }
}

/// Side effect executed right after a transition commits.
///
/// The instance is already in the destination state when the action runs.
/// Actions get mutable access so they can update the host context. Any
/// `Fn(&mut Fsm<'_, C>)` is an action.
pub trait Action<C> {
    /// Run the side effect.
    fn execute(&self, fsm: &mut Fsm<'_, C>);
}

impl<C, F> Action<C> for F
where
    F: Fn(&mut Fsm<'_, C>),
{
    fn execute(&self, fsm: &mut Fsm<'_, C>) {
        self(fsm)
    }
}

/// One row of a transition table.
///
/// An absent guard always holds. An absent action does nothing.
///
/// # Example
///
/// ```rust
/// use polled_fsm::core::Transition;
/// use polled_fsm::engine::Fsm;
///
/// struct Lamp {
///     switched: u32,
/// }
///
/// let transition = Transition::new(0, 1)
///     .when(|fsm: &Fsm<'_, Lamp>| fsm.context().switched < 10)
///     .then(|fsm: &mut Fsm<'_, Lamp>| fsm.context_mut().switched += 1);
///
/// assert_eq!(transition.origin, 0);
/// assert_eq!(transition.destination, 1);
/// assert!(transition.is_guarded());
/// assert!(transition.has_action());
/// ```
pub struct Transition<C> {
    pub origin: StateId,
    pub guard: Option<Box<dyn Guard<C>>>,
    pub destination: StateId,
    pub action: Option<Box<dyn Action<C>>>,
}

impl<C> Transition<C> {
    /// Unguarded transition without an action.
    pub fn new(origin: StateId, destination: StateId) -> Self {
        Self {
            origin,
            guard: None,
            destination,
            action: None,
        }
    }

    /// End-of-table marker for sentinel-terminated tables.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL, SENTINEL)
    }

    /// Attach a guard, replacing any previous one.
    pub fn guard<G>(mut self, guard: G) -> Self
    where
        G: Guard<C> + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Attach a guard written as a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&Fsm<'_, C>) -> bool + 'static,
    {
        self.guard(predicate)
    }

    /// Attach an action, replacing any previous one.
    pub fn action<A>(mut self, action: A) -> Self
    where
        A: Action<C> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Attach an action written as a closure.
    pub fn then<F>(self, effect: F) -> Self
    where
        F: Fn(&mut Fsm<'_, C>) + 'static,
    {
        self.action(effect)
    }

    pub fn is_sentinel(&self) -> bool {
        self.origin == SENTINEL
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Evaluate the guard, treating an absent guard as satisfied.
    pub fn guard_holds(&self, fsm: &Fsm<'_, C>) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check(fsm))
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("origin", &self.origin)
            .field("guarded", &self.is_guarded())
            .field("destination", &self.destination)
            .field("has_action", &self.has_action())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionTable;

    #[derive(Default)]
    struct Host {
        ready: bool,
        actions: u32,
    }

    fn is_ready(fsm: &Fsm<'_, Host>) -> bool {
        fsm.context().ready
    }

    #[test]
    fn new_transition_has_no_guard_or_action() {
        let transition: Transition<Host> = Transition::new(3, 4);

        assert_eq!(transition.origin, 3);
        assert_eq!(transition.destination, 4);
        assert!(!transition.is_guarded());
        assert!(!transition.has_action());
        assert!(!transition.is_sentinel());
    }

    #[test]
    fn sentinel_is_recognised() {
        let transition: Transition<Host> = Transition::sentinel();

        assert!(transition.is_sentinel());
        assert_eq!(transition.destination, SENTINEL);
    }

    #[test]
    fn absent_guard_always_holds() {
        let table = TransitionTable::new().with(Transition::new(0, 1));
        let fsm = Fsm::bind(&table, Host::default()).unwrap();

        assert!(table.transitions()[0].guard_holds(&fsm));
    }

    #[test]
    fn guard_reads_host_context() {
        let table = TransitionTable::new().with(Transition::new(0, 1).guard(is_ready));
        let mut fsm = Fsm::bind(&table, Host::default()).unwrap();

        assert!(!table.transitions()[0].guard_holds(&fsm));

        fsm.context_mut().ready = true;
        assert!(table.transitions()[0].guard_holds(&fsm));
    }

    #[test]
    fn action_mutates_host_context() {
        let transition =
            Transition::new(0, 1).then(|fsm: &mut Fsm<'_, Host>| fsm.context_mut().actions += 1);
        let table = TransitionTable::new().with(Transition::new(0, 1));
        let mut fsm = Fsm::bind(&table, Host::default()).unwrap();

        if let Some(action) = &transition.action {
            action.execute(&mut fsm);
            action.execute(&mut fsm);
        }

        assert_eq!(fsm.context().actions, 2);
    }

    #[test]
    fn debug_output_hides_callbacks() {
        let transition: Transition<Host> = Transition::new(0, 1).guard(is_ready);
        let rendered = format!("{transition:?}");

        assert!(rendered.contains("guarded: true"));
        assert!(rendered.contains("has_action: false"));
    }
}
