//! Memory strategies for engine-owned instances.
//!
//! Only [`OwnedFsm`](crate::engine::OwnedFsm) goes through an allocator: the
//! machine is written into the memory the allocator grants and dropped in
//! place before that memory is handed back. Caller-owned instances live
//! wherever the host puts them.
//!
//! # Example
//!
//! ```rust
//! use polled_fsm::alloc::{Allocator, PoolAllocator};
//! use std::alloc::Layout;
//!
//! let pool = PoolAllocator::with_slots(2, 64);
//! let layout = Layout::new::<[u64; 4]>();
//!
//! let a = pool.allocate(layout).unwrap();
//! let b = pool.allocate(layout).unwrap();
//! assert!(pool.allocate(layout).is_none());
//! assert!(pool.contains(a.cast::<u8>().as_ptr()));
//!
//! unsafe { pool.release(a.cast(), layout) };
//! assert_eq!(pool.in_use(), 1);
//! unsafe { pool.release(b.cast(), layout) };
//! ```

use std::alloc::Layout;
use std::cell::{Cell, UnsafeCell};
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr::NonNull;
use tracing::warn;

/// Memory strategy used when the engine owns an instance.
///
/// `allocate` returns `None` when it cannot serve the request; construction
/// then fails without exposing an instance. The granted slice reports how
/// many bytes are usable.
///
/// # Safety
///
/// Memory returned by `allocate` must stay valid for reads and writes of the
/// reported length, and must not be handed out again, until it comes back
/// through `release`. The engine checks the granted length and alignment
/// before writing, and releases grants it cannot use.
pub unsafe trait Allocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<[u8]>>;

    /// Return memory to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator with the same
    /// `layout`, and must not have been released already.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<[u8]>> {
        (**self).allocate(layout)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).release(ptr, layout)
    }
}

/// Default strategy: the global heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<[u8]>> {
        // The global allocator has no meaning for zero-sized requests.
        if layout.size() == 0 {
            return None;
        }
        let ptr = NonNull::new(unsafe { std::alloc::alloc(layout) })?;
        Some(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout);
    }
}

/// Alignment of every pool slot.
pub const SLOT_ALIGN: usize = 16;

#[repr(align(16))]
struct Block(UnsafeCell<MaybeUninit<[u8; SLOT_ALIGN]>>);

impl Block {
    fn new() -> Self {
        Self(UnsafeCell::new(MaybeUninit::uninit()))
    }
}

/// Fixed number of equally sized slots carved out of one buffer, for hosts
/// that budget instances up front.
///
/// Slots are [`SLOT_ALIGN`]-aligned. Releasing a pointer that is not the
/// start of an occupied slot is logged and ignored.
pub struct PoolAllocator {
    storage: Box<[Block]>,
    stride: usize,
    slot_size: usize,
    slots: Box<[Cell<bool>]>,
}

impl PoolAllocator {
    /// Pool of `count` slots, each able to hold `slot_size` bytes.
    pub fn with_slots(count: usize, slot_size: usize) -> Self {
        let blocks_per_slot = slot_size.div_ceil(SLOT_ALIGN).max(1);
        let storage = (0..count * blocks_per_slot).map(|_| Block::new()).collect();
        Self {
            storage,
            stride: blocks_per_slot * SLOT_ALIGN,
            slot_size,
            slots: (0..count).map(|_| Cell::new(false)).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|used| used.get()).count()
    }

    pub fn available(&self) -> usize {
        self.capacity() - self.in_use()
    }

    /// Whether `ptr` points into this pool's storage.
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.offset_of(ptr)
            .is_some_and(|offset| offset < self.storage.len() * SLOT_ALIGN)
    }

    fn base(&self) -> *mut u8 {
        // Every byte of the buffer sits inside an `UnsafeCell`, so writing
        // through a pointer derived from `&self` is allowed.
        self.storage.as_ptr().cast::<u8>().cast_mut()
    }

    fn offset_of(&self, ptr: *const u8) -> Option<usize> {
        (ptr as usize).checked_sub(self.base() as usize)
    }

    fn slot_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        let offset = self.offset_of(ptr.as_ptr())?;
        if offset % self.stride != 0 {
            return None;
        }
        let slot = offset / self.stride;
        (slot < self.slots.len()).then_some(slot)
    }
}

unsafe impl Allocator for PoolAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<[u8]>> {
        if layout.size() > self.slot_size || layout.align() > SLOT_ALIGN {
            warn!(
                size = layout.size(),
                align = layout.align(),
                slot_size = self.slot_size,
                "request does not fit a pool slot"
            );
            return None;
        }

        let slot = self.slots.iter().position(|used| !used.get())?;
        let ptr = NonNull::new(self.base().wrapping_add(slot * self.stride))?;
        self.slots[slot].set(true);
        Some(NonNull::slice_from_raw_parts(ptr, self.slot_size))
    }

    /// Pointers this pool did not grant, and slots already free, are
    /// ignored with a warning.
    unsafe fn release(&self, ptr: NonNull<u8>, _layout: Layout) {
        match self.slot_of(ptr) {
            Some(slot) if self.slots[slot].get() => self.slots[slot].set(false),
            _ => warn!(
                address = ptr.as_ptr() as usize,
                "released memory this pool does not hold"
            ),
        }
    }
}

impl fmt::Debug for PoolAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("capacity", &self.capacity())
            .field("slot_size", &self.slot_size)
            .field("in_use", &self.in_use())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(size: usize) -> Layout {
        Layout::from_size_align(size, 8).unwrap()
    }

    #[test]
    fn system_allocator_grants_usable_memory() {
        let allocator = SystemAllocator;
        let layout = bytes(1024);

        let grant = allocator.allocate(layout).unwrap();
        assert_eq!(grant.len(), 1024);

        let ptr = grant.cast::<u8>();
        unsafe {
            ptr.as_ptr().write_bytes(0xAB, layout.size());
            assert_eq!(*ptr.as_ptr().add(1023), 0xAB);
            allocator.release(ptr, layout);
        }
    }

    #[test]
    fn system_allocator_refuses_zero_sized_requests() {
        assert!(SystemAllocator.allocate(bytes(0)).is_none());
    }

    #[test]
    fn pool_hands_out_distinct_aligned_slots() {
        let pool = PoolAllocator::with_slots(3, 20);

        let a = pool.allocate(bytes(8)).unwrap().cast::<u8>();
        let b = pool.allocate(bytes(8)).unwrap().cast::<u8>();

        assert_ne!(a, b);
        assert_eq!(a.as_ptr() as usize % SLOT_ALIGN, 0);
        assert_eq!(b.as_ptr() as usize % SLOT_ALIGN, 0);
        assert!(pool.contains(a.as_ptr()) && pool.contains(b.as_ptr()));
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn pool_slots_do_not_overlap() {
        let pool = PoolAllocator::with_slots(2, 20);
        let layout = bytes(20);

        let a = pool.allocate(layout).unwrap().cast::<u8>();
        let b = pool.allocate(layout).unwrap().cast::<u8>();
        unsafe {
            a.as_ptr().write_bytes(1, 20);
            b.as_ptr().write_bytes(2, 20);
            assert!((0..20).all(|i| *a.as_ptr().add(i) == 1));
        }
    }

    #[test]
    fn pool_refuses_when_exhausted() {
        let pool = PoolAllocator::with_slots(1, 16);

        let held = pool.allocate(bytes(16)).unwrap();

        assert!(pool.allocate(bytes(16)).is_none());
        unsafe { pool.release(held.cast(), bytes(16)) };
        assert!(pool.allocate(bytes(16)).is_some());
    }

    #[test]
    fn pool_refuses_oversized_or_overaligned_requests() {
        let pool = PoolAllocator::with_slots(4, 64);

        assert!(pool.allocate(bytes(65)).is_none());
        assert!(pool
            .allocate(Layout::from_size_align(8, 2 * SLOT_ALIGN).unwrap())
            .is_none());
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn pool_ignores_pointers_it_did_not_grant() {
        let pool = PoolAllocator::with_slots(1, 32);
        let held = pool.allocate(bytes(32)).unwrap().cast::<u8>();
        let mut outside = [0u8; 32];

        unsafe {
            pool.release(NonNull::from(&mut outside).cast(), bytes(32));
            pool.release(NonNull::new(held.as_ptr().add(1)).unwrap(), bytes(32));
        }

        assert_eq!(pool.in_use(), 1);
        assert!(pool.allocate(bytes(32)).is_none());
    }

    #[test]
    fn pool_ignores_double_release() {
        let pool = PoolAllocator::with_slots(2, 32);
        let first = pool.allocate(bytes(32)).unwrap().cast::<u8>();
        let _second = pool.allocate(bytes(32)).unwrap();

        unsafe {
            pool.release(first, bytes(32));
            pool.release(first, bytes(32));
        }

        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn empty_pool_refuses_everything() {
        let pool = PoolAllocator::with_slots(0, 32);

        assert!(pool.allocate(bytes(8)).is_none());
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn allocator_works_through_reference() {
        let pool = PoolAllocator::with_slots(1, 16);
        let shared = &pool;

        let grant = shared.allocate(bytes(4)).unwrap();
        assert_eq!(pool.in_use(), 1);

        unsafe { shared.release(grant.cast(), bytes(4)) };
        assert_eq!(pool.in_use(), 0);
    }
}
