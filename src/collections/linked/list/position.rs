use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use super::NodePtr;

/// A handle to a single node of a [`DoublyLinkedList`](super::DoublyLinkedList), including the two
/// sentinel nodes at either end.
///
/// Positions are compared by node identity, not by value: two positions are equal only if they
/// refer to the same node. A Position stays valid until the node it refers to is erased from its
/// list (or the list is dropped). Inserting, erasing other nodes, splicing, merging, sorting,
/// reversing and swapping lists never invalidate it.
///
/// Positions don't borrow the list they came from, so the compiler can't check their validity.
/// Every method consuming one is therefore `unsafe`, with the caller promising that the position
/// belongs to that list and is still valid. [`Cursor`](crate::collections::linked::Cursor) and
/// [`CursorMut`](crate::collections::linked::CursorMut) offer the same navigation without this
/// obligation.
pub struct Position<T> {
    pub(crate) node: NodePtr<T>,
}

impl<T> Position<T> {
    pub(crate) const fn new(node: NodePtr<T>) -> Position<T> {
        Position { node }
    }
}

impl<T> Clone for Position<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Position<T> {}

impl<T> Hash for Position<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.0.hash(state);
    }
}

impl<T> Debug for Position<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Position").field(&self.node).finish()
    }
}
