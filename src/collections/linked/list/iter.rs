use std::fmt::{self, Debug, Formatter};
use std::iter::FusedIterator;
use std::marker::PhantomData;

use super::{DoublyLinkedList, NodePtr, Position};
use crate::alloc::Allocator;

/// The element nodes still to be yielded by a borrowed iterator, tracked from both ends.
struct Remaining<T> {
    front: NodePtr<T>,
    back: NodePtr<T>,
    len: usize,
}

impl<T> Remaining<T> {
    fn of<A: Allocator>(list: &DoublyLinkedList<T, A>) -> Remaining<T> {
        Remaining {
            front: list.head.next(),
            back: list.tail.prev(),
            len: list.len,
        }
    }

    fn next_node(&mut self) -> Option<NodePtr<T>> {
        if self.len == 0 {
            return None;
        }
        let node = self.front;
        self.front = node.next();
        self.len -= 1;
        Some(node)
    }

    fn next_back_node(&mut self) -> Option<NodePtr<T>> {
        if self.len == 0 {
            return None;
        }
        let node = self.back;
        self.back = node.prev();
        self.len -= 1;
        Some(node)
    }
}

impl<T> Clone for Remaining<T> {
    fn clone(&self) -> Self {
        Remaining {
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<T, A: Allocator> IntoIterator for DoublyLinkedList<T, A> {
    type Item = T;

    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            list: self,
        }
    }
}

pub struct IntoIter<T, A: Allocator> {
    // The iterator just holds onto the list and pops from either end.
    pub(crate) list: DoublyLinkedList<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    fn len(&self) -> usize {
        self.list.len()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DoublyLinkedList<T, A> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            remaining: Remaining::of(self),
            _phantom: PhantomData,
        }
    }
}

pub struct Iter<'a, T> {
    remaining: Remaining<T>,
    _phantom: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.next_node().map(NodePtr::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.remaining.next_back_node().map(NodePtr::value)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {
    fn len(&self) -> usize {
        self.remaining.len
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            remaining: self.remaining.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<'a, T: Debug> Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// SAFETY: Iter only hands out shared references.
unsafe impl<'a, T: Sync> Send for Iter<'a, T> {}

// SAFETY: Iter only hands out shared references.
unsafe impl<'a, T: Sync> Sync for Iter<'a, T> {}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DoublyLinkedList<T, A> {
    type Item = &'a mut T;

    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            remaining: Remaining::of(self),
            _phantom: PhantomData,
        }
    }
}

pub struct IterMut<'a, T> {
    // Each node is yielded at most once, from whichever end reaches it first, so the mutable
    // references never alias.
    remaining: Remaining<T>,
    _phantom: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.next_node().map(NodePtr::value_mut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.remaining.next_back_node().map(NodePtr::value_mut)
    }
}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {
    fn len(&self) -> usize {
        self.remaining.len
    }
}

// SAFETY: IterMut behaves like a unique borrow of the elements.
unsafe impl<'a, T: Send> Send for IterMut<'a, T> {}

// SAFETY: IterMut behaves like a unique borrow of the elements.
unsafe impl<'a, T: Sync> Sync for IterMut<'a, T> {}

/// An iterator over the [`Position`] of each element in a list, created by
/// [`DoublyLinkedList::positions`].
pub struct Positions<'a, T> {
    remaining: Remaining<T>,
    _phantom: PhantomData<&'a T>,
}

impl<'a, T> Positions<'a, T> {
    pub(crate) fn new<A: Allocator>(list: &'a DoublyLinkedList<T, A>) -> Positions<'a, T> {
        Positions {
            remaining: Remaining::of(list),
            _phantom: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Positions<'a, T> {
    type Item = Position<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining.next_node().map(Position::new)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<'a, T> DoubleEndedIterator for Positions<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.remaining.next_back_node().map(Position::new)
    }
}

impl<'a, T> FusedIterator for Positions<'a, T> {}

impl<'a, T> ExactSizeIterator for Positions<'a, T> {
    fn len(&self) -> usize {
        self.remaining.len
    }
}
