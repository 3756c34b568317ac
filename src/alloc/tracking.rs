use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use super::{AllocError, Allocator, Global};

/// An allocator wrapper which counts the allocations passing through it, and optionally refuses
/// to hand out more than a fixed number of live blocks.
///
/// The counters use [`Cell`], so a Tracking allocator can't be shared between threads. To give
/// several collections the same counters, hand each of them a reference (`&Tracking`), which is
/// itself an [`Allocator`].
///
/// Zero sized requests are passed on but not counted.
#[derive(Debug, Default)]
pub struct Tracking<A: Allocator = Global> {
    inner: A,
    live: Cell<usize>,
    total: Cell<usize>,
    limit: Cell<Option<usize>>,
}

impl Tracking<Global> {
    /// Creates a new Tracking allocator over [`Global`], with no limit.
    pub const fn new() -> Tracking<Global> {
        Tracking::wrap(Global)
    }
}

impl<A: Allocator> Tracking<A> {
    /// Wraps `inner`, with no limit.
    pub const fn wrap(inner: A) -> Tracking<A> {
        Tracking {
            inner,
            live: Cell::new(0),
            total: Cell::new(0),
            limit: Cell::new(None),
        }
    }

    /// Returns the number of blocks currently allocated and not yet freed.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Returns the number of successful allocations made over this allocator's lifetime.
    pub fn total(&self) -> usize {
        self.total.get()
    }

    /// Returns the current limit on live blocks, if there is one.
    pub fn limit(&self) -> Option<usize> {
        self.limit.get()
    }

    /// Sets the maximum number of live blocks. Once reached, all further allocations fail until
    /// something is freed. Passing `None` removes the limit.
    pub fn set_limit(&self, limit: Option<usize>) {
        self.limit.set(limit);
    }

    /// Sets the limit so that exactly `count` more blocks can be allocated.
    pub fn allow(&self, count: usize) {
        self.limit.set(Some(self.live.get() + count));
    }

    /// Returns a reference to the wrapped allocator.
    pub const fn inner(&self) -> &A {
        &self.inner
    }
}

// SAFETY: Every request is forwarded to the inner allocator; Tracking only refuses some of them.
// Deallocating through a different Tracking value is sound as long as the inner allocators allow
// it, though the counters of both values will then be off.
unsafe impl<A: Allocator> Allocator for Tracking<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return self.inner.allocate(layout);
        }

        if let Some(limit) = self.limit.get() {
            if self.live.get() >= limit {
                return Err(AllocError::for_layout(layout));
            }
        }

        let ptr = self.inner.allocate(layout)?;
        self.live.set(self.live.get() + 1);
        self.total.set(self.total.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            self.live.set(self.live.get().saturating_sub(1));
        }
        // SAFETY: Upheld by the caller.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}
