//! Transition tables and their validation.

use super::error::FsmError;
use super::transition::{StateId, Transition, SENTINEL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the number of transitions in a table, sentinel excluded.
///
/// Construction and initialization both reject larger tables.
pub const MAX_TRANSITIONS: usize = 128;

/// Serializable description of one table row, used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionInfo {
    pub index: usize,
    pub origin: StateId,
    pub destination: StateId,
    pub guarded: bool,
    pub has_action: bool,
}

/// Ordered sequence of transitions evaluated by the engine.
///
/// The table is owned by the embedding application and only borrowed by
/// instances, so a single table can drive any number of machines. If a
/// sentinel row (origin `-1`) is present, the logical table ends right before
/// it.
///
/// # Example
///
/// ```rust
/// use polled_fsm::core::{Transition, TransitionTable};
///
/// let table: TransitionTable<()> = TransitionTable::new()
///     .with(Transition::new(0, 1))
///     .with(Transition::new(1, 0));
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.first().map(|t| t.origin), Some(0));
/// ```
pub struct TransitionTable<C> {
    entries: Vec<Transition<C>>,
}

impl<C> TransitionTable<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Import a sentinel-terminated row list.
    ///
    /// The first sentinel and every row after it are dropped.
    pub fn from_terminated(mut entries: Vec<Transition<C>>) -> Self {
        if let Some(end) = entries.iter().position(Transition::is_sentinel) {
            entries.truncate(end);
        }
        Self { entries }
    }

    /// Append a transition, builder style.
    pub fn with(mut self, transition: Transition<C>) -> Self {
        self.entries.push(transition);
        self
    }

    pub fn push(&mut self, transition: Transition<C>) {
        self.entries.push(transition);
    }

    /// Rows the engine evaluates, in table order.
    pub fn transitions(&self) -> &[Transition<C>] {
        let end = self
            .entries
            .iter()
            .position(Transition::is_sentinel)
            .unwrap_or(self.entries.len());
        &self.entries[..end]
    }

    /// Number of transitions before the sentinel.
    pub fn len(&self) -> usize {
        self.transitions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<&Transition<C>> {
        self.transitions().first()
    }

    /// Describe every row without exposing the callbacks.
    pub fn layout(&self) -> Vec<TransitionInfo> {
        self.transitions()
            .iter()
            .enumerate()
            .map(|(index, t)| TransitionInfo {
                index,
                origin: t.origin,
                destination: t.destination,
                guarded: t.is_guarded(),
                has_action: t.has_action(),
            })
            .collect()
    }

    /// Check the table can drive a machine and return its transition count.
    ///
    /// The leading row must be a real transition, the count must stay within
    /// [`MAX_TRANSITIONS`], and no row may target the sentinel.
    pub fn validate(&self) -> Result<usize, FsmError> {
        let transitions = self.transitions();

        if transitions.is_empty() {
            return Err(FsmError::EmptyTable);
        }

        if transitions.len() > MAX_TRANSITIONS {
            return Err(FsmError::CapacityExceeded {
                count: transitions.len(),
                max: MAX_TRANSITIONS,
            });
        }

        if let Some(index) = transitions.iter().position(|t| t.destination == SENTINEL) {
            return Err(FsmError::SentinelDestination { index });
        }

        Ok(transitions.len())
    }
}

impl<C> Default for TransitionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FromIterator<Transition<C>> for TransitionTable<C> {
    fn from_iter<I: IntoIterator<Item = Transition<C>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<C> fmt::Debug for TransitionTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.transitions()).finish()
    }
}
