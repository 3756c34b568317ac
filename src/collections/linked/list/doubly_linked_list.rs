use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::iter;
use std::marker::PhantomData;
use std::mem;

use super::{Chain, Iter, IterMut, Node, NodePtr, Position, Positions};
use crate::alloc::{AllocError, Allocator, Global};
use crate::collections::linked::cursor::{Cursor, CursorMut};
use crate::util::result::ResultExtension;

/// A list with links in both directions, storing its nodes in memory obtained from an
/// [`Allocator`]. See also: [`Cursor`] and [`CursorMut`] for bi-directional traversal and
/// mutation, and [`Position`] for node handles that outlive a borrow.
///
/// The list always owns two sentinel nodes, one before the first element and one after the last.
/// They are allocated when the list is created and freed when it is dropped, so every element
/// node has a neighbour on both sides and insertion or removal never has to special case the
/// ends. [`end`](DoublyLinkedList::end) is the position of the trailing sentinel.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the DoublyLinkedList.
/// - `m`: The number of items affected by a range operation.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)` |
/// | `pop_front/back` | `O(1)` |
/// | `insert` | `O(1)` |
/// | `erase` | `O(1)` |
/// | `erase_range` | `O(m)` |
/// | `splice/append/prepend` | `O(1)` |
/// | `take_from` | `O(1)` + clearing self |
/// | `swap` | `O(1)` |
/// | `clear` | `O(n)` |
/// | `resize` | `O(m)` |
/// | `merge` | `O(n + m)` |
/// | `remove/remove_if` | `O(n)` |
/// | `reverse` | `O(n)` |
/// | `unique` | `O(n)` |
/// | `sort` | `O(n log n)` |
/// | `contains` | `O(n)` |
///
/// # Thread Safety
/// The list does no internal synchronization. It can be shared between threads for reading when
/// `T` and `A` are [`Sync`], and all mutation requires a unique borrow.
pub struct DoublyLinkedList<T, A: Allocator = Global> {
    pub(crate) head: NodePtr<T>,
    pub(crate) tail: NodePtr<T>,
    pub(crate) len: usize,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> DoublyLinkedList<T> {
    /// Creates a new DoublyLinkedList with no elements, using the [`Global`] allocator.
    ///
    /// # Panics
    /// Panics if the sentinel nodes can't be allocated.
    pub fn new() -> DoublyLinkedList<T> {
        DoublyLinkedList::new_in(Global)
    }

    /// Creates a new DoublyLinkedList containing `count` clones of `value`.
    ///
    /// # Panics
    /// Panics if any allocation fails.
    pub fn repeat(value: T, count: usize) -> DoublyLinkedList<T> where T: Clone {
        DoublyLinkedList::repeat_in(value, count, Global)
    }

    /// Creates a new DoublyLinkedList containing `count` default values.
    ///
    /// # Panics
    /// Panics if any allocation fails.
    pub fn repeat_default(count: usize) -> DoublyLinkedList<T> where T: Default {
        DoublyLinkedList::repeat_default_in(count, Global)
    }
}

impl<T, A: Allocator> DoublyLinkedList<T, A> {
    /// Creates a new DoublyLinkedList with no elements, which will allocate from `alloc`.
    ///
    /// # Panics
    /// Panics if the sentinel nodes can't be allocated.
    pub fn new_in(alloc: A) -> DoublyLinkedList<T, A> {
        DoublyLinkedList::try_new_in(alloc).throw()
    }

    /// Creates a new DoublyLinkedList with no elements, which will allocate from `alloc`,
    /// returning an [`Err`] if the sentinel nodes can't be allocated.
    pub fn try_new_in(alloc: A) -> Result<DoublyLinkedList<T, A>, AllocError> {
        let head = Self::try_alloc_sentinel(&alloc)?;
        let tail = match Self::try_alloc_sentinel(&alloc) {
            Ok(tail) => tail,
            Err(err) => {
                // SAFETY: head was allocated above as a single node and hasn't been shared.
                unsafe { alloc.deallocate_n(head.0, 1); }
                return Err(err);
            },
        };
        NodePtr::join(head, tail);

        Ok(DoublyLinkedList {
            head,
            tail,
            len: 0,
            alloc,
            _phantom: PhantomData,
        })
    }

    /// Creates a new DoublyLinkedList containing `count` clones of `value`, which will allocate
    /// from `alloc`.
    ///
    /// # Panics
    /// Panics if any allocation fails.
    pub fn repeat_in(value: T, count: usize, alloc: A) -> DoublyLinkedList<T, A> where T: Clone {
        DoublyLinkedList::try_repeat_in(value, count, alloc).throw()
    }

    /// Creates a new DoublyLinkedList containing `count` clones of `value`, returning an [`Err`]
    /// if any allocation fails.
    pub fn try_repeat_in(
        value: T,
        count: usize,
        alloc: A,
    ) -> Result<DoublyLinkedList<T, A>, AllocError> where T: Clone {
        let mut list = DoublyLinkedList::try_new_in(alloc)?;
        list.try_resize_with(count, || value.clone())?;
        Ok(list)
    }

    /// Creates a new DoublyLinkedList containing `count` default values, which will allocate from
    /// `alloc`.
    ///
    /// # Panics
    /// Panics if any allocation fails.
    pub fn repeat_default_in(count: usize, alloc: A) -> DoublyLinkedList<T, A> where T: Default {
        DoublyLinkedList::try_repeat_default_in(count, alloc).throw()
    }

    /// Creates a new DoublyLinkedList containing `count` default values, returning an [`Err`] if
    /// any allocation fails.
    pub fn try_repeat_default_in(
        count: usize,
        alloc: A,
    ) -> Result<DoublyLinkedList<T, A>, AllocError> where T: Default {
        let mut list = DoublyLinkedList::try_new_in(alloc)?;
        list.try_resize_with(count, T::default)?;
        Ok(list)
    }

    /// Returns a reference to the list's allocator.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the length of the DoublyLinkedList.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the DoublyLinkedList contains no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the largest number of elements a list of this type could theoretically hold.
    pub const fn max_len(&self) -> usize {
        isize::MAX as usize / size_of::<Node<T>>()
    }

    /// Returns a reference to the first element in the list, if it exists.
    pub fn front(&self) -> Option<&T> {
        match self.is_empty() {
            true => None,
            false => Some(self.head.next().value()),
        }
    }

    /// Returns a mutable reference to the first element in the list, if it exists.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        match self.is_empty() {
            true => None,
            false => Some(self.head.next().value_mut()),
        }
    }

    /// Returns a reference to the last element in the list, if it exists.
    pub fn back(&self) -> Option<&T> {
        match self.is_empty() {
            true => None,
            false => Some(self.tail.prev().value()),
        }
    }

    /// Returns a mutable reference to the last element in the list, if it exists.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.is_empty() {
            true => None,
            false => Some(self.tail.prev().value_mut()),
        }
    }

    /// Returns the position of the first element, which is [`end`](Self::end) for an empty list.
    pub fn begin(&self) -> Position<T> {
        Position::new(self.head.next())
    }

    /// Returns the position of the trailing sentinel, one past the last element.
    pub const fn end(&self) -> Position<T> {
        Position::new(self.tail)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.into_iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.into_iter()
    }

    /// Returns an iterator over the position of every element, front to back.
    pub fn positions(&self) -> Positions<'_, T> {
        Positions::new(self)
    }

    /// Returns a cursor pointing to the first element, or the trailing sentinel if the list is
    /// empty.
    pub fn cursor_front(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.head.next())
    }

    /// Returns a cursor pointing to the last element, or the leading sentinel if the list is
    /// empty.
    pub fn cursor_back(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.tail.prev())
    }

    /// Returns a cursor pointing to the trailing sentinel.
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.tail)
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        let node = self.head.next();
        CursorMut::new(self, node)
    }

    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        let node = self.tail.prev();
        CursorMut::new(self, node)
    }

    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        let node = self.tail;
        CursorMut::new(self, node)
    }

    /// Add the provided element to the back of the DoublyLinkedList.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn push_back(&mut self, value: T) {
        self.try_push_back(value).throw()
    }

    /// Add the provided element to the back of the DoublyLinkedList, returning an [`Err`] if the
    /// node can't be allocated. The list is unchanged on failure and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.try_emplace_back_with(|| value)
    }

    /// Add the provided element to the front of the DoublyLinkedList.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn push_front(&mut self, value: T) {
        self.try_push_front(value).throw()
    }

    /// Add the provided element to the front of the DoublyLinkedList, returning an [`Err`] if the
    /// node can't be allocated. The list is unchanged on failure and `value` is dropped.
    pub fn try_push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.try_emplace_front_with(|| value)
    }

    /// Allocates a node at the back of the list, then writes the result of `f` directly into it.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn emplace_back_with<F: FnOnce() -> T>(&mut self, f: F) {
        self.try_emplace_back_with(f).throw()
    }

    /// Allocates a node at the back of the list, then writes the result of `f` directly into it.
    /// If the allocation fails, `f` is never called.
    pub fn try_emplace_back_with<F: FnOnce() -> T>(&mut self, f: F) -> Result<(), AllocError> {
        let node = self.try_create_node(f)?;
        self.link_before(self.tail, node);
        Ok(())
    }

    /// Allocates a node at the front of the list, then writes the result of `f` directly into it.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    pub fn emplace_front_with<F: FnOnce() -> T>(&mut self, f: F) {
        self.try_emplace_front_with(f).throw()
    }

    /// Allocates a node at the front of the list, then writes the result of `f` directly into it.
    /// If the allocation fails, `f` is never called.
    pub fn try_emplace_front_with<F: FnOnce() -> T>(&mut self, f: F) -> Result<(), AllocError> {
        let node = self.try_create_node(f)?;
        self.link_before(self.head.next(), node);
        Ok(())
    }

    /// Removes the last element from the list and returns it, if the list isn't empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let node = self.tail.prev();
        self.unlink(node);
        // SAFETY: The list wasn't empty, so node held a value, and it has just been unlinked.
        Some(unsafe { self.take_node(node) })
    }

    /// Removes the first element from the list and returns it, if the list isn't empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let node = self.head.next();
        self.unlink(node);
        // SAFETY: The list wasn't empty, so node held a value, and it has just been unlinked.
        Some(unsafe { self.take_node(node) })
    }

    /// Removes and drops every element, front to back.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Resizes the list to contain `count` elements, appending default values or removing
    /// elements from the back as required.
    ///
    /// # Panics
    /// Panics if a node can't be allocated.
    pub fn resize(&mut self, count: usize) where T: Default {
        self.try_resize_with(count, T::default).throw()
    }

    /// Resizes the list to contain `count` elements, appending default values or removing
    /// elements from the back as required. If an allocation fails, an [`Err`] is returned and the
    /// list is unchanged.
    pub fn try_resize(&mut self, count: usize) -> Result<(), AllocError> where T: Default {
        self.try_resize_with(count, T::default)
    }

    /// Resizes the list to contain `count` elements, appending values produced by `f` or removing
    /// elements from the back as required.
    ///
    /// # Panics
    /// Panics if a node can't be allocated.
    pub fn resize_with<F: FnMut() -> T>(&mut self, count: usize, f: F) {
        self.try_resize_with(count, f).throw()
    }

    /// Resizes the list to contain `count` elements, appending values produced by `f` or removing
    /// elements from the back as required. If an allocation fails, an [`Err`] is returned and the
    /// list is unchanged. Values already produced by `f` are dropped.
    pub fn try_resize_with<F: FnMut() -> T>(
        &mut self,
        count: usize,
        f: F,
    ) -> Result<(), AllocError> {
        if self.len < count {
            let chain = self.try_create_chain(iter::repeat_with(f).take(count - self.len))?;
            self.link_chain_before(self.tail, chain);
        }
        while self.len > count {
            self.pop_back();
        }
        Ok(())
    }

    /// Returns a reference to the element at `pos`, or [`None`] if `pos` is one of the sentinels.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn get(&self, pos: Position<T>) -> Option<&T> {
        match self.is_sentinel(pos.node) {
            true => None,
            false => Some(pos.node.value()),
        }
    }

    /// Returns a mutable reference to the element at `pos`, or [`None`] if `pos` is one of the
    /// sentinels.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn get_mut(&mut self, pos: Position<T>) -> Option<&mut T> {
        match self.is_sentinel(pos.node) {
            true => None,
            false => Some(pos.node.value_mut()),
        }
    }

    /// Returns the position after `pos`. The trailing sentinel has no successor, so
    /// [`end`](Self::end) is returned unchanged.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn next_position(&self, pos: Position<T>) -> Position<T> {
        match pos.node == self.tail {
            true => pos,
            false => Position::new(pos.node.next()),
        }
    }

    /// Returns the position before `pos`. The leading sentinel has no predecessor, so it is
    /// returned unchanged.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn prev_position(&self, pos: Position<T>) -> Position<T> {
        match pos.node == self.head {
            true => pos,
            false => Position::new(pos.node.prev()),
        }
    }

    /// Returns a cursor pointing to `pos`.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn cursor_at(&self, pos: Position<T>) -> Cursor<'_, T, A> {
        Cursor::new(self, pos.node)
    }

    /// Returns a mutable cursor pointing to `pos`.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn cursor_at_mut(&mut self, pos: Position<T>) -> CursorMut<'_, T, A> {
        CursorMut::new(self, pos.node)
    }

    /// Inserts `value` directly before `pos`, returning the position of the new element.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn insert(&mut self, pos: Position<T>, value: T) -> Position<T> {
        // SAFETY: Upheld by the caller.
        unsafe { self.try_insert(pos, value) }.throw()
    }

    /// Inserts `value` directly before `pos`, returning the position of the new element or an
    /// [`Err`] if the node can't be allocated. Inserting before the leading sentinel inserts at
    /// the front.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn try_insert(
        &mut self,
        pos: Position<T>,
        value: T,
    ) -> Result<Position<T>, AllocError> {
        // SAFETY: Upheld by the caller.
        unsafe { self.try_emplace_with(pos, || value) }
    }

    /// Inserts `count` clones of `value` directly before `pos`, returning the position of the last
    /// one inserted, or `pos` itself if `count` is zero.
    ///
    /// # Panics
    /// Panics if a node can't be allocated.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn insert_repeat(&mut self, pos: Position<T>, value: T, count: usize) -> Position<T>
    where
        T: Clone,
    {
        // SAFETY: Upheld by the caller.
        unsafe { self.try_insert_repeat(pos, value, count) }.throw()
    }

    /// Inserts `count` clones of `value` directly before `pos`, returning the position of the last
    /// one inserted, or `pos` itself if `count` is zero. If an allocation fails, an [`Err`] is
    /// returned and the list is unchanged.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn try_insert_repeat(
        &mut self,
        pos: Position<T>,
        value: T,
        count: usize,
    ) -> Result<Position<T>, AllocError> where T: Clone {
        let chain = self.try_create_chain(iter::repeat_n(value, count))?;
        Ok(match self.link_chain_before(self.insertion_point(pos.node), chain) {
            Some(last) => Position::new(last),
            None => pos,
        })
    }

    /// Allocates a node directly before `pos`, then writes the result of `f` into it.
    ///
    /// # Panics
    /// Panics if the node can't be allocated.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn emplace_with<F: FnOnce() -> T>(&mut self, pos: Position<T>, f: F) -> Position<T> {
        // SAFETY: Upheld by the caller.
        unsafe { self.try_emplace_with(pos, f) }.throw()
    }

    /// Allocates a node directly before `pos`, then writes the result of `f` into it. If the
    /// allocation fails, `f` is never called.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn try_emplace_with<F: FnOnce() -> T>(
        &mut self,
        pos: Position<T>,
        f: F,
    ) -> Result<Position<T>, AllocError> {
        let node = self.try_create_node(f)?;
        self.link_before(self.insertion_point(pos.node), node);
        Ok(Position::new(node))
    }

    /// Removes and drops the element at `pos`, returning the position that followed it. Erasing
    /// a sentinel does nothing and returns `pos`.
    ///
    /// Only positions referring to the erased node are invalidated.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn erase(&mut self, pos: Position<T>) -> Position<T> {
        if self.is_sentinel(pos.node) {
            return pos;
        }
        let next = pos.node.next();
        self.unlink(pos.node);
        // SAFETY: The node isn't a sentinel and has just been unlinked.
        unsafe { self.destroy_node(pos.node); }
        Position::new(next)
    }

    /// Removes and drops every element from `first` up to, but not including, `last`, returning
    /// `last`. A range starting at the leading sentinel starts at the first element.
    ///
    /// # Safety
    /// Both positions must have been obtained from this list and must not have been erased, and
    /// `last` must be reachable from `first` by moving forwards.
    pub unsafe fn erase_range(&mut self, first: Position<T>, last: Position<T>) -> Position<T> {
        if first == last {
            return last;
        }
        let mut pos = Position::new(self.insertion_point(first.node));
        while pos != last {
            // SAFETY: Upheld by the caller, every position up to last belongs to this list.
            let next = unsafe { self.erase(pos) };
            if next == pos {
                break;
            }
            pos = next;
        }
        pos
    }

    /// Moves every element of `other` directly before `pos` by relinking, leaving `other` empty.
    /// No elements are moved or copied in memory.
    ///
    /// # Safety
    /// `pos` must have been obtained from this list and its node must not have been erased.
    pub unsafe fn splice(&mut self, pos: Position<T>, other: &mut DoublyLinkedList<T, A>) {
        if other.is_empty() {
            return;
        }
        let (first, last, count) = (other.head.next(), other.tail.prev(), other.len);
        self.transfer_before(self.insertion_point(pos.node), other, first, last, count);
    }

    /// Moves every element of `other` to the back of this list, leaving `other` empty.
    pub fn append(&mut self, other: &mut DoublyLinkedList<T, A>) {
        // SAFETY: end is always a valid position of this list.
        unsafe { self.splice(self.end(), other) }
    }

    /// Moves every element of `other` to the front of this list, leaving `other` empty.
    pub fn prepend(&mut self, other: &mut DoublyLinkedList<T, A>) {
        // SAFETY: begin is always a valid position of this list.
        unsafe { self.splice(self.begin(), other) }
    }

    /// Replaces the contents of this list with the elements of `other`, leaving `other` empty.
    /// The existing elements are dropped, while those of `other` are relinked rather than moved.
    pub fn take_from(&mut self, other: &mut DoublyLinkedList<T, A>) {
        self.clear();
        self.append(other);
    }

    /// Swaps the contents (and allocators) of two lists. No elements move in memory, so positions
    /// into either list remain valid, now referring into the other list.
    pub fn swap(&mut self, other: &mut DoublyLinkedList<T, A>) {
        mem::swap(self, other);
    }

    /// Replaces the contents of this list with clones of the elements of `source`, keeping this
    /// list's allocator. If an allocation fails, an [`Err`] is returned and the list is unchanged.
    pub fn try_clone_from(&mut self, source: &DoublyLinkedList<T, A>) -> Result<(), AllocError>
    where
        T: Clone,
    {
        let chain = self.try_create_chain(source.iter().cloned())?;
        self.clear();
        self.link_chain_before(self.tail, chain);
        Ok(())
    }

    /// Returns true if any element is equal to `item`.
    pub fn contains(&self, item: &T) -> bool where T: PartialEq {
        self.iter().any(|element| element == item)
    }
}

impl<T, A: Allocator + Clone> DoublyLinkedList<T, A> {
    /// Moves all elements into a new list using a clone of this list's allocator, leaving this
    /// list empty.
    ///
    /// # Panics
    /// Panics if the new list's sentinels can't be allocated.
    pub fn take(&mut self) -> DoublyLinkedList<T, A> {
        self.try_take().throw()
    }

    /// Moves all elements into a new list using a clone of this list's allocator, leaving this
    /// list empty. On failure, the elements stay in this list.
    pub fn try_take(&mut self) -> Result<DoublyLinkedList<T, A>, AllocError> {
        let mut list = DoublyLinkedList::try_new_in(self.alloc.clone())?;
        list.take_from(self);
        Ok(list)
    }

    /// Creates a deep copy of this list, cloning every element in order into a list which uses a
    /// clone of this list's allocator.
    pub fn try_clone(&self) -> Result<DoublyLinkedList<T, A>, AllocError> where T: Clone {
        let mut list = DoublyLinkedList::try_new_in(self.alloc.clone())?;
        for value in self.iter() {
            list.try_push_back(value.clone())?;
        }
        Ok(list)
    }
}

impl<T, A: Allocator> DoublyLinkedList<T, A> {
    fn try_alloc_sentinel(alloc: &A) -> Result<NodePtr<T>, AllocError> {
        let ptr = alloc.allocate_n::<Node<T>>(1)?;
        // SAFETY: ptr was just allocated with space for exactly one Node.
        unsafe { alloc.construct(ptr, Node::sentinel()); }
        Ok(NodePtr(ptr))
    }

    /// Allocates a detached node, only calling `f` once the memory is available.
    pub(crate) fn try_create_node<F: FnOnce() -> T>(&self, f: F) -> Result<NodePtr<T>, AllocError> {
        let ptr = self.alloc.allocate_n::<Node<T>>(1)?;
        // SAFETY: ptr was just allocated with space for exactly one Node.
        unsafe { self.alloc.construct(ptr, Node::with_value(f())); }
        Ok(NodePtr(ptr))
    }

    /// Drops the value of a detached node and frees it.
    ///
    /// # Safety
    /// `node` must be an element node (not a sentinel) which has been unlinked from every list.
    pub(crate) unsafe fn destroy_node(&self, node: NodePtr<T>) {
        // SAFETY: Element nodes always hold an initialized value and were allocated as one Node.
        unsafe {
            self.alloc.destroy(node.value_ptr());
            self.alloc.deallocate_n(node.0, 1);
        }
    }

    /// Moves the value out of a detached node and frees it.
    ///
    /// # Safety
    /// `node` must be an element node (not a sentinel) which has been unlinked from every list.
    pub(crate) unsafe fn take_node(&self, node: NodePtr<T>) -> T {
        // SAFETY: Element nodes always hold an initialized value, and it is read exactly once
        // before the node is freed.
        unsafe {
            let value = node.value_ptr().read();
            self.alloc.deallocate_n(node.0, 1);
            value
        }
    }

    /// Allocates a detached chain of nodes holding `values` in order. If an allocation fails, the
    /// nodes allocated so far are destroyed and nothing is left behind.
    pub(crate) fn try_create_chain<I: Iterator<Item = T>>(
        &self,
        values: I,
    ) -> Result<Option<Chain<T>>, AllocError> {
        let mut chain: Option<Chain<T>> = None;
        for value in values {
            let node = match self.try_create_node(|| value) {
                Ok(node) => node,
                Err(err) => {
                    if let Some(chain) = chain {
                        // SAFETY: The chain was created above and never linked into a list.
                        unsafe { self.destroy_chain(chain); }
                    }
                    return Err(err);
                },
            };
            chain = Some(match chain {
                None => Chain { first: node, last: node, len: 1 },
                Some(chain) => {
                    NodePtr::join(chain.last, node);
                    Chain { last: node, len: chain.len + 1, ..chain }
                },
            });
        }
        Ok(chain)
    }

    /// Drops and frees every node of a detached chain.
    ///
    /// # Safety
    /// Every node of `chain` must be an element node which isn't linked into any list.
    unsafe fn destroy_chain(&self, chain: Chain<T>) {
        let mut node = chain.first;
        for _ in 0..chain.len {
            let next = node.next();
            // SAFETY: Upheld by the caller, each node is destroyed exactly once.
            unsafe { self.destroy_node(node); }
            node = next;
        }
    }

    /// Links a detached chain directly before `pos`, returning its last node.
    pub(crate) fn link_chain_before(
        &mut self,
        pos: NodePtr<T>,
        chain: Option<Chain<T>>,
    ) -> Option<NodePtr<T>> {
        let chain = chain?;
        NodePtr::join(pos.prev(), chain.first);
        NodePtr::join(chain.last, pos);
        self.len += chain.len;
        Some(chain.last)
    }

    /// Links a detached node directly before `pos`.
    pub(crate) fn link_before(&mut self, pos: NodePtr<T>, node: NodePtr<T>) {
        NodePtr::join(pos.prev(), node);
        NodePtr::join(node, pos);
        self.len += 1;
    }

    /// Unlinks an element node, leaving its own links untouched.
    pub(crate) fn unlink(&mut self, node: NodePtr<T>) {
        NodePtr::join(node.prev(), node.next());
        self.len -= 1;
    }

    /// Moves the run of `count` nodes from `first` to `last` (inclusive) out of `other` and links
    /// it directly before `pos`.
    pub(crate) fn transfer_before(
        &mut self,
        pos: NodePtr<T>,
        other: &mut DoublyLinkedList<T, A>,
        first: NodePtr<T>,
        last: NodePtr<T>,
        count: usize,
    ) {
        NodePtr::join(first.prev(), last.next());
        other.len -= count;

        NodePtr::join(pos.prev(), first);
        NodePtr::join(last, pos);
        self.len += count;
    }

    pub(crate) fn is_sentinel(&self, node: NodePtr<T>) -> bool {
        node == self.head || node == self.tail
    }

    /// Nothing can be linked before the leading sentinel, so inserting there means inserting at
    /// the front.
    pub(crate) fn insertion_point(&self, pos: NodePtr<T>) -> NodePtr<T> {
        match pos == self.head {
            true => self.head.next(),
            false => pos,
        }
    }

    /// Asserts that the links are consistent in both directions and agree with `len`.
    #[cfg(test)]
    pub(crate) fn verify_links(&self) {
        let mut forward = 0;
        let mut curr = self.head;
        while curr != self.tail {
            let next = curr.next();
            assert!(next.prev() == curr, "next.prev should point back to the node.");
            curr = next;
            forward += 1;
        }

        let mut backward = 0;
        let mut curr = self.tail;
        while curr != self.head {
            curr = curr.prev();
            backward += 1;
        }

        // Both walks count one sentinel.
        assert_eq!(forward - 1, self.len, "Forward walk should agree with len.");
        assert_eq!(backward - 1, self.len, "Backward walk should agree with len.");
    }
}

impl<T, A: Allocator + Default> Default for DoublyLinkedList<T, A> {
    fn default() -> Self {
        DoublyLinkedList::new_in(A::default())
    }
}

impl<T, A: Allocator> Drop for DoublyLinkedList<T, A> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: Both sentinels were allocated as single nodes in try_new_in, never hold a value
        // and are freed exactly once, here.
        unsafe {
            self.alloc.deallocate_n(self.head.0, 1);
            self.alloc.deallocate_n(self.tail.0, 1);
        }
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for DoublyLinkedList<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().throw()
    }

    fn clone_from(&mut self, source: &Self) {
        self.try_clone_from(source).throw()
    }
}

impl<T, A: Allocator + Default> FromIterator<T> for DoublyLinkedList<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = DoublyLinkedList::default();
        list.extend(iter);
        list
    }
}

impl<T, A: Allocator> Extend<T> for DoublyLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for DoublyLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: PartialEq, A: Allocator> PartialEq for DoublyLinkedList<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator> Eq for DoublyLinkedList<T, A> {}

impl<T: Hash, A: Allocator> Hash for DoublyLinkedList<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self.iter() {
            value.hash(state);
        }

        // Terminate variable length hashing sequence.
        0xFF.hash(state);
    }
}

impl<T: Debug, A: Allocator> Debug for DoublyLinkedList<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoublyLinkedList")
            .field("contents", &self.iter())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Debug, A: Allocator> Display for DoublyLinkedList<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, value) in self.iter().enumerate() {
            if index != 0 {
                write!(f, ") -> (")?;
            }
            write!(f, "{value:?}")?;
        }
        write!(f, ")")
    }
}

// SAFETY: The list owns its elements and allocator, so sending it sends both.
unsafe impl<T: Send, A: Allocator + Send> Send for DoublyLinkedList<T, A> {}

// SAFETY: Shared access only ever produces shared references to elements and the allocator.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for DoublyLinkedList<T, A> {}
