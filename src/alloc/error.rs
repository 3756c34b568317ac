use std::alloc::Layout;

use derive_more::{Display, Error};

/// The error produced when an [`Allocator`](super::Allocator) can't provide the memory requested
/// of it.
///
/// The collection that made the request is left exactly as it was before the failed operation.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[display("Failed to allocate {size} bytes with alignment {align}!")]
pub struct AllocError {
    pub size: usize,
    pub align: usize,
}

impl AllocError {
    /// Creates an AllocError describing a failed request for the provided `layout`.
    pub const fn for_layout(layout: Layout) -> AllocError {
        AllocError {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Creates an AllocError for a request that couldn't even be described by a [`Layout`],
    /// because the total size overflows.
    pub const fn overflow<U>() -> AllocError {
        AllocError {
            size: usize::MAX,
            align: align_of::<U>(),
        }
    }
}
