use std::fmt::{self, Debug, Formatter};

use super::{State, StateMut};
use crate::alloc::{AllocError, Allocator, Global};
use crate::collections::linked::list::{DoublyLinkedList, NodePtr, Position};
use crate::util::result::ResultExtension;

/// A type for bi-directional traversal of a [`DoublyLinkedList`]. See
/// [`DoublyLinkedList::cursor_front`], [`DoublyLinkedList::cursor_back`] and
/// [`DoublyLinkedList::cursor_end`] to create one.
pub struct Cursor<'a, T, A: Allocator = Global> {
    pub(crate) list: &'a DoublyLinkedList<T, A>,
    pub(crate) curr: NodePtr<T>,
}

/// A type for bi-directional traversal and mutation of a [`DoublyLinkedList`]. See
/// [`DoublyLinkedList::cursor_front_mut`], [`DoublyLinkedList::cursor_back_mut`] and
/// [`DoublyLinkedList::cursor_end_mut`] to create one.
pub struct CursorMut<'a, T, A: Allocator = Global> {
    pub(crate) list: &'a mut DoublyLinkedList<T, A>,
    pub(crate) curr: NodePtr<T>,
}

impl<'a, T, A: Allocator> Cursor<'a, T, A> {
    pub(crate) const fn new(
        list: &'a DoublyLinkedList<T, A>,
        curr: NodePtr<T>,
    ) -> Cursor<'a, T, A> {
        Cursor { list, curr }
    }

    /// Returns the list this cursor is traversing.
    pub const fn list(&self) -> &'a DoublyLinkedList<T, A> {
        self.list
    }

    /// Returns the position of the node the cursor is pointing at.
    pub const fn position(&self) -> Position<T> {
        Position::new(self.curr)
    }

    pub fn state(&self) -> State<'a, T> {
        if self.curr == self.list.head {
            State::Head
        } else if self.curr == self.list.tail {
            State::Tail
        } else {
            State::Node(self.curr.value())
        }
    }

    /// Returns the element under the cursor, or [`None`] if it is on a sentinel.
    pub fn read(&self) -> Option<&'a T> {
        match self.state() {
            State::Node(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the element after the cursor, if there is one.
    pub fn read_next(&self) -> Option<&'a T> {
        if self.curr == self.list.tail {
            return None;
        }
        let next = self.curr.next();
        match next == self.list.tail {
            true => None,
            false => Some(next.value()),
        }
    }

    /// Returns the element before the cursor, if there is one.
    pub fn read_prev(&self) -> Option<&'a T> {
        if self.curr == self.list.head {
            return None;
        }
        let prev = self.curr.prev();
        match prev == self.list.head {
            true => None,
            false => Some(prev.value()),
        }
    }

    /// Moves the cursor to the next node. Does nothing when already on the trailing sentinel.
    pub fn move_next(&mut self) -> &mut Self {
        if self.curr != self.list.tail {
            self.curr = self.curr.next();
        }
        self
    }

    /// Moves the cursor to the previous node. Does nothing when already on the leading sentinel.
    pub fn move_prev(&mut self) -> &mut Self {
        if self.curr != self.list.head {
            self.curr = self.curr.prev();
        }
        self
    }
}

impl<'a, T, A: Allocator> Clone for Cursor<'a, T, A> {
    fn clone(&self) -> Self {
        Cursor {
            list: self.list,
            curr: self.curr,
        }
    }
}

impl<'a, T: Debug, A: Allocator> Debug for Cursor<'a, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state())
            .field("list", self.list)
            .finish()
    }
}

impl<'a, T, A: Allocator> CursorMut<'a, T, A> {
    pub(crate) const fn new(
        list: &'a mut DoublyLinkedList<T, A>,
        curr: NodePtr<T>,
    ) -> CursorMut<'a, T, A> {
        CursorMut { list, curr }
    }

    /// Returns a read-only cursor at the same node, borrowing this one.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor::new(&*self.list, self.curr)
    }

    /// Returns the position of the node the cursor is pointing at.
    pub const fn position(&self) -> Position<T> {
        Position::new(self.curr)
    }

    pub fn state(&self) -> State<'_, T> {
        self.as_cursor().state()
    }

    pub fn state_mut(&mut self) -> StateMut<'_, T> {
        if self.curr == self.list.head {
            StateMut::Head
        } else if self.curr == self.list.tail {
            StateMut::Tail
        } else {
            StateMut::Node(self.curr.value_mut())
        }
    }

    /// Returns the element under the cursor, or [`None`] if it is on a sentinel.
    pub fn read(&self) -> Option<&T> {
        self.as_cursor().read()
    }

    /// Returns the element under the cursor mutably, or [`None`] if it is on a sentinel.
    pub fn read_mut(&mut self) -> Option<&mut T> {
        match self.state_mut() {
            StateMut::Node(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the element after the cursor, if there is one.
    pub fn read_next(&self) -> Option<&T> {
        self.as_cursor().read_next()
    }

    /// Returns the element before the cursor, if there is one.
    pub fn read_prev(&self) -> Option<&T> {
        self.as_cursor().read_prev()
    }

    /// Moves the cursor to the next node. Does nothing when already on the trailing sentinel.
    pub fn move_next(&mut self) -> &mut Self {
        if self.curr != self.list.tail {
            self.curr = self.curr.next();
        }
        self
    }

    /// Moves the cursor to the previous node. Does nothing when already on the leading sentinel.
    pub fn move_prev(&mut self) -> &mut Self {
        if self.curr != self.list.head {
            self.curr = self.curr.prev();
        }
        self
    }

    /// Inserts `value` directly before the cursor, returning its position. The cursor doesn't
    /// move. On the leading sentinel, the value becomes the new front.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn insert_before(&mut self, value: T) -> Position<T> {
        self.try_insert_before(value).throw()
    }

    /// Inserts `value` directly before the cursor, returning its position or an [`Err`] if the node
    /// can't be allocated. The cursor doesn't move.
    pub fn try_insert_before(&mut self, value: T) -> Result<Position<T>, AllocError> {
        let pos = self.position();
        // SAFETY: The cursor always points at a live node of its list.
        unsafe { self.list.try_insert(pos, value) }
    }

    /// Removes the element under the cursor and returns it, moving the cursor to the following
    /// node. Returns [`None`] without moving if the cursor is on a sentinel.
    pub fn erase(&mut self) -> Option<T> {
        if self.list.is_sentinel(self.curr) {
            return None;
        }
        let node = self.curr;
        self.curr = node.next();
        self.list.unlink(node);
        // SAFETY: node was an element node of the list and has just been unlinked.
        Some(unsafe { self.list.take_node(node) })
    }

    /// Moves every element of `other` directly before the cursor, leaving `other` empty. The
    /// cursor doesn't move.
    pub fn splice_before(&mut self, other: &mut DoublyLinkedList<T, A>) {
        let pos = self.position();
        // SAFETY: The cursor always points at a live node of its list.
        unsafe { self.list.splice(pos, other) }
    }
}

impl<'a, T: Debug, A: Allocator> Debug for CursorMut<'a, T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.as_cursor().fmt(f)
    }
}
