//! Cursors over a [`DoublyLinkedList`](super::DoublyLinkedList).
//!
//! A cursor points at exactly one node of a list, which may be either of the sentinels. Moving
//! past a sentinel does nothing, so a cursor can't leave its list. [`Cursor`] borrows the list
//! immutably, while [`CursorMut`] borrows it mutably and can insert, erase and splice around its
//! current node.

mod cursor;
mod state;

pub use cursor::*;
pub use state::*;
