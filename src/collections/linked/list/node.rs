use std::fmt::{self, Debug, Formatter};
use std::mem::MaybeUninit;
use std::ptr::NonNull;

// NOTE: NodePtr's accessors are safe to call, but they all dereference the pointer. Within this
// crate a NodePtr is only ever created for a node owned by a live list, and is only used while
// that list is borrowed appropriately. The outward links of the two sentinels are dangling and
// must never be followed.

pub(crate) struct NodePtr<T>(pub NonNull<Node<T>>);

pub(crate) struct Node<T> {
    /// Uninitialized for sentinels, initialized for every other node.
    pub value: MaybeUninit<T>,
    pub prev: NodePtr<T>,
    pub next: NodePtr<T>,
}

/// A run of element nodes linked to each other in order, but not to any list. The outer links of
/// `first` and `last` are dangling.
pub(crate) struct Chain<T> {
    pub first: NodePtr<T>,
    pub last: NodePtr<T>,
    pub len: usize,
}

impl<T> Node<T> {
    pub const fn sentinel() -> Node<T> {
        Node {
            value: MaybeUninit::uninit(),
            prev: NodePtr::dangling(),
            next: NodePtr::dangling(),
        }
    }

    pub const fn with_value(value: T) -> Node<T> {
        Node {
            value: MaybeUninit::new(value),
            prev: NodePtr::dangling(),
            next: NodePtr::dangling(),
        }
    }
}

impl<T> NodePtr<T> {
    pub const fn dangling() -> NodePtr<T> {
        NodePtr(NonNull::dangling())
    }

    /// Returns a reference to the node's value, which must be initialized.
    pub const fn value<'a>(self) -> &'a T {
        // SAFETY: Only called on non-sentinel nodes, which always hold a value.
        unsafe { (*self.0.as_ptr()).value.assume_init_ref() }
    }

    /// Returns a mutable reference to the node's value, which must be initialized.
    #[allow(clippy::mut_from_ref)]
    pub const fn value_mut<'a>(self) -> &'a mut T {
        // SAFETY: Only called on non-sentinel nodes while the owning list is mutably borrowed.
        unsafe { (*self.0.as_ptr()).value.assume_init_mut() }
    }

    pub const fn value_ptr(self) -> NonNull<T> {
        // SAFETY: The node is live, so the address of its value slot is non-null.
        unsafe { NonNull::new_unchecked((*self.0.as_ptr()).value.as_mut_ptr()) }
    }

    pub const fn prev(self) -> NodePtr<T> {
        // SAFETY: The node is live.
        unsafe { (*self.0.as_ptr()).prev }
    }

    pub const fn next(self) -> NodePtr<T> {
        // SAFETY: The node is live.
        unsafe { (*self.0.as_ptr()).next }
    }

    pub const fn set_prev(self, prev: NodePtr<T>) {
        // SAFETY: The node is live and no reference to its links is held.
        unsafe { (*self.0.as_ptr()).prev = prev; }
    }

    pub const fn set_next(self, next: NodePtr<T>) {
        // SAFETY: The node is live and no reference to its links is held.
        unsafe { (*self.0.as_ptr()).next = next; }
    }

    /// Swaps the direction of this node's links.
    pub const fn flip(self) {
        let prev = self.prev();
        self.set_prev(self.next());
        self.set_next(prev);
    }

    /// Links `first` directly before `second`.
    pub const fn join(first: NodePtr<T>, second: NodePtr<T>) {
        first.set_next(second);
        second.set_prev(first);
    }
}

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodePtr<T> {}

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for NodePtr<T> {}

impl<T> Debug for NodePtr<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", self.0)
    }
}
