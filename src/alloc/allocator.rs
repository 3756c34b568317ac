use std::alloc::Layout;
use std::ptr::NonNull;

use super::AllocError;

/// A source of raw memory for collections.
///
/// Only the two untyped methods need to be implemented. The typed methods (`allocate_n`,
/// `deallocate_n`, `construct` and `destroy`) are generic over the value type, so an allocator
/// written with no knowledge of a collection's internal node type can still be used for it.
///
/// # Safety
/// Implementors must ensure that:
/// - A successful `allocate` returns a block valid for reads and writes of `layout.size()` bytes,
///   aligned to `layout.align()`, which stays valid until it is passed to `deallocate`.
/// - A block allocated through one value of the implementing type may be deallocated through any
///   other value of the same type. Collections move nodes between each other (e.g. when
///   splicing), so a node may be freed by a different allocator value than the one that produced
///   it.
pub unsafe trait Allocator {
    /// Attempts to allocate a block of memory described by `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Deallocates the block at `ptr`.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate` (on a value of this type) with the same
    /// `layout`, and must not have been deallocated already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Allocates uninitialized space for `n` values of type `U`.
    fn allocate_n<U>(&self, n: usize) -> Result<NonNull<U>, AllocError> {
        let layout = Layout::array::<U>(n).map_err(|_| AllocError::overflow::<U>())?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        Ok(self.allocate(layout)?.cast())
    }

    /// Deallocates space for `n` values of type `U`, without dropping any of them.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate_n::<U>(n)` with the same `n`, and must not have
    /// been deallocated already.
    unsafe fn deallocate_n<U>(&self, ptr: NonNull<U>, n: usize) {
        match Layout::array::<U>(n) {
            Ok(layout) if layout.size() != 0 => {
                // SAFETY: The caller guarantees that ptr was allocated with this exact layout.
                unsafe { self.deallocate(ptr.cast(), layout) }
            },
            // Zero sized requests never reached allocate, and an overflowing layout could never
            // have been allocated in the first place.
            _ => {},
        }
    }

    /// Moves `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for writes and properly aligned for `U`. Any value previously at `ptr`
    /// is overwritten without being dropped.
    unsafe fn construct<U>(&self, ptr: NonNull<U>, value: U) {
        // SAFETY: Upheld by the caller.
        unsafe { ptr.write(value) }
    }

    /// Drops the value at `ptr` in place, leaving the slot uninitialized.
    ///
    /// # Safety
    /// `ptr` must point to an initialized `U` which isn't used again until it is re-constructed.
    unsafe fn destroy<U>(&self, ptr: NonNull<U>) {
        // SAFETY: Upheld by the caller.
        unsafe { ptr.drop_in_place() }
    }
}

// SAFETY: All requests are forwarded to the referenced allocator, so its guarantees carry over.
unsafe impl<A: Allocator> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Upheld by the caller.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}
