//! Engine-owned instances living in allocator-provided memory.

use super::machine::Fsm;
use crate::alloc::{Allocator, SystemAllocator};
use crate::core::{FsmError, TransitionTable};
use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use tracing::{debug, warn};

/// Machine whose memory the engine manages.
///
/// The instance is written into memory granted by an allocator, and is
/// dropped in place and handed back by [`destroy`](Self::destroy), or on
/// drop. It dereferences to [`Fsm`], so firing and the state accessors work
/// the same as for caller-owned instances.
pub struct OwnedFsm<'t, C = (), A: Allocator = SystemAllocator> {
    fsm: NonNull<Fsm<'t, C>>,
    allocator: A,
    _owns: PhantomData<Fsm<'t, C>>,
}

impl<'t, C> OwnedFsm<'t, C, SystemAllocator> {
    /// Construct an instance on the global heap.
    pub fn new(table: &'t TransitionTable<C>, context: C) -> Result<Self, FsmError> {
        Self::new_in(table, context, SystemAllocator)
    }
}

impl<'t, C, A: Allocator> OwnedFsm<'t, C, A> {
    /// Construct an instance in memory granted by `allocator`.
    ///
    /// The table is bound before allocating, so a rejected table never
    /// touches the allocator. A grant that is too small or misaligned for
    /// the machine is released before the error is returned.
    pub fn new_in(
        table: &'t TransitionTable<C>,
        context: C,
        allocator: A,
    ) -> Result<Self, FsmError> {
        let fsm = Fsm::bind(table, context).inspect_err(|err| {
            warn!(error = %err, "refusing to construct machine");
        })?;

        let layout = Layout::new::<Fsm<'t, C>>();
        let Some(grant) = allocator.allocate(layout) else {
            warn!(size = layout.size(), "allocator refused machine instance");
            return Err(FsmError::AllocationFailed {
                size: layout.size(),
            });
        };

        let slot = grant.cast::<Fsm<'t, C>>();
        if grant.len() < layout.size() || !slot.as_ptr().is_aligned() {
            warn!(
                granted = grant.len(),
                size = layout.size(),
                align = layout.align(),
                "allocator grant cannot hold a machine"
            );
            // SAFETY: the grant came from this allocator with `layout` and
            // nothing was written to it.
            unsafe { allocator.release(grant.cast(), layout) };
            return Err(FsmError::InvalidGrant {
                size: layout.size(),
                align: layout.align(),
            });
        }

        // SAFETY: the grant is large enough and aligned for the machine, and
        // the allocator keeps it exclusive until it is released in `drop`.
        unsafe { slot.as_ptr().write(fsm) };

        debug!(
            address = slot.as_ptr() as usize,
            size = layout.size(),
            "constructed engine-owned machine"
        );
        Ok(Self {
            fsm: slot,
            allocator,
            _owns: PhantomData,
        })
    }

    /// Drop the instance and release its memory through its allocator.
    pub fn destroy(self) {
        drop(self);
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Address of the instance inside the allocator's memory.
    pub fn as_ptr(&self) -> *const Fsm<'t, C> {
        self.fsm.as_ptr()
    }
}

impl<'t, C, A: Allocator> Deref for OwnedFsm<'t, C, A> {
    type Target = Fsm<'t, C>;

    fn deref(&self) -> &Self::Target {
        // SAFETY: initialised in `new_in` and live until `drop`.
        unsafe { self.fsm.as_ref() }
    }
}

impl<C, A: Allocator> DerefMut for OwnedFsm<'_, C, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as for `deref`; `&mut self` makes the access unique.
        unsafe { self.fsm.as_mut() }
    }
}

impl<'t, C, A: Allocator> Drop for OwnedFsm<'t, C, A> {
    fn drop(&mut self) {
        debug!(
            address = self.fsm.as_ptr() as usize,
            "releasing engine-owned machine"
        );
        // SAFETY: the machine was written in `new_in` and is dropped exactly
        // once, then its grant goes back with the layout it was requested
        // with.
        unsafe {
            ptr::drop_in_place(self.fsm.as_ptr());
            self.allocator
                .release(self.fsm.cast(), Layout::new::<Fsm<'t, C>>());
        }
    }
}

impl<C: fmt::Debug, A: Allocator> fmt::Debug for OwnedFsm<'_, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedFsm")
            .field("fsm", &**self)
            .field("address", &self.fsm)
            .finish()
    }
}
