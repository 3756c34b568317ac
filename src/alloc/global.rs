use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use super::{AllocError, Allocator};

/// The system allocator, as exposed by [`std::alloc`].
///
/// Unlike [`Box`] or `std`'s collections, a failed allocation is reported as an [`AllocError`]
/// rather than by calling [`alloc::handle_alloc_error`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

// SAFETY: Blocks come straight from the global allocator, which doesn't distinguish between
// callers, so any Global value can free any other's allocation.
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            let dangling = ptr::without_provenance_mut(layout.align());
            // SAFETY: A layout's alignment is always a non-zero power of two.
            return Ok(unsafe { NonNull::new_unchecked(dangling) });
        }

        NonNull::new(
            // SAFETY: The layout has a non-zero size.
            unsafe { alloc::alloc(layout) }
        ).ok_or(AllocError::for_layout(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: The caller guarantees that ptr came from allocate with this layout, and
            // non-zero sized layouts are always passed on to alloc::alloc.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}
