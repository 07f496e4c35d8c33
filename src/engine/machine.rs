//! Caller-owned machine instances and the firing algorithm.

use crate::core::{FsmError, StateId, TransitionTable, SENTINEL};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Result of one [`Fsm::fire`] call.
///
/// Only `Transitioned` changes the state. `Blocked` and `NoTransitions` are
/// ordinary polling results, not failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireOutcome {
    /// The row at `index` fired and moved the machine from `from` to `to`.
    Transitioned {
        from: StateId,
        to: StateId,
        index: usize,
    },

    /// Rows exist for `state` but every guard rejected.
    Blocked { state: StateId, candidates: usize },

    /// No row starts at `state`.
    NoTransitions { state: StateId },
}

impl FireOutcome {
    /// Integer signal: `1` transitioned, `0` blocked, `-1` no transitions.
    pub fn code(&self) -> i32 {
        match self {
            Self::Transitioned { .. } => 1,
            Self::Blocked { .. } => 0,
            Self::NoTransitions { .. } => -1,
        }
    }

    pub fn transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// A machine instance bound to a borrowed transition table.
///
/// The instance carries a host context `C` so guards and actions can reach
/// the data of the object embedding the machine. Tables are borrowed for
/// `'t`, which keeps them alive for as long as any instance uses them.
///
/// # Example
///
/// ```rust
/// use polled_fsm::core::{Transition, TransitionTable};
/// use polled_fsm::engine::{FireOutcome, Fsm};
///
/// #[derive(Default)]
/// struct Blinker {
///     enabled: bool,
///     toggles: u32,
/// }
///
/// fn enabled(fsm: &Fsm<'_, Blinker>) -> bool {
///     fsm.context().enabled
/// }
///
/// fn count(fsm: &mut Fsm<'_, Blinker>) {
///     fsm.context_mut().toggles += 1;
/// }
///
/// let table = TransitionTable::new()
///     .with(Transition::new(0, 1).guard(enabled).action(count))
///     .with(Transition::new(1, 0).guard(enabled).action(count));
///
/// let mut fsm = Fsm::bind(&table, Blinker::default()).unwrap();
/// assert_eq!(fsm.state(), 0);
///
/// // Guard rejects: state is kept.
/// assert_eq!(fsm.fire().unwrap().code(), 0);
///
/// fsm.context_mut().enabled = true;
/// assert_eq!(
///     fsm.fire().unwrap(),
///     FireOutcome::Transitioned { from: 0, to: 1, index: 0 }
/// );
/// assert_eq!(fsm.context().toggles, 1);
/// ```
pub struct Fsm<'t, C = ()> {
    current_state: StateId,
    table: Option<&'t TransitionTable<C>>,
    context: C,
}

impl<'t, C> Fsm<'t, C> {
    /// Storage not yet bound to any table. Firing it fails until
    /// [`init`](Self::init) succeeds.
    pub fn unbound(context: C) -> Self {
        Self {
            current_state: SENTINEL,
            table: None,
            context,
        }
    }

    /// Create an instance and bind it to `table` in one step.
    pub fn bind(table: &'t TransitionTable<C>, context: C) -> Result<Self, FsmError> {
        let mut fsm = Self::unbound(context);
        fsm.init(table)?;
        Ok(fsm)
    }

    /// Bind this instance to `table` and enter the table's first origin state.
    ///
    /// Returns the number of transitions. The table is validated before
    /// anything is written, so on error the instance is left as it was.
    /// Calling it again rebinds the instance to the new table.
    pub fn init(&mut self, table: &'t TransitionTable<C>) -> Result<usize, FsmError> {
        let count = table.validate().inspect_err(|err| {
            warn!(error = %err, "rejected transition table");
        })?;

        self.table = Some(table);
        self.current_state = table.transitions()[0].origin;

        debug!(
            transitions = count,
            initial_state = self.current_state,
            "machine bound to transition table"
        );
        Ok(count)
    }

    /// Evaluate the table once from the current state.
    ///
    /// Rows are scanned in order. The first row whose origin matches and
    /// whose guard holds wins: the state moves to its destination, then its
    /// action runs. Later rows are not evaluated.
    pub fn fire(&mut self) -> Result<FireOutcome, FsmError> {
        let table = self.table.ok_or(FsmError::Unbound)?;
        let from = self.current_state;
        let mut candidates = 0;

        for (index, transition) in table.transitions().iter().enumerate() {
            if transition.origin != from {
                continue;
            }

            candidates += 1;
            if !transition.guard_holds(self) {
                continue;
            }

            let to = transition.destination;
            self.current_state = to;
            if let Some(action) = &transition.action {
                action.execute(self);
            }

            debug!(from, to, index, "transition fired");
            return Ok(FireOutcome::Transitioned { from, to, index });
        }

        if candidates == 0 {
            trace!(state = from, "no transitions defined for state");
            Ok(FireOutcome::NoTransitions { state: from })
        } else {
            trace!(state = from, candidates, "all guards rejected");
            Ok(FireOutcome::Blocked {
                state: from,
                candidates,
            })
        }
    }

    pub fn state(&self) -> StateId {
        self.current_state
    }

    /// Overwrite the current state, bypassing guards and actions.
    ///
    /// Nothing checks that `state` appears in the table; firing from an
    /// unknown state yields [`FireOutcome::NoTransitions`].
    pub fn set_state(&mut self, state: StateId) {
        self.current_state = state;
    }

    pub fn table(&self) -> Option<&'t TransitionTable<C>> {
        self.table
    }

    pub fn is_bound(&self) -> bool {
        self.table.is_some()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }
}

impl<C: Default> Default for Fsm<'_, C> {
    fn default() -> Self {
        Self::unbound(C::default())
    }
}

impl<C: fmt::Debug> fmt::Debug for Fsm<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("current_state", &self.current_state)
            .field("bound", &self.is_bound())
            .field("context", &self.context)
            .finish()
    }
}
