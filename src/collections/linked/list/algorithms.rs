use std::mem;

use super::{DoublyLinkedList, NodePtr};
use crate::alloc::{AllocError, Allocator};
use crate::util::result::ResultExtension;

impl<T, A: Allocator> DoublyLinkedList<T, A> {
    /// Merges the elements of `other` into this list, leaving `other` empty. Both lists are
    /// expected to be sorted in non-decreasing order, in which case the result is too.
    ///
    /// The merge is stable: elements of this list come before equal elements from `other`, and
    /// elements from the same list keep their relative order. Nodes are relinked, so no element
    /// is moved or copied and positions into either list stay valid (those from `other` now
    /// refer into this list).
    ///
    /// If either list isn't sorted, every element still ends up in this list, in an unspecified
    /// order.
    pub fn merge(&mut self, other: &mut DoublyLinkedList<T, A>) where T: PartialOrd {
        if other.is_empty() {
            return;
        }

        let mut current = self.head.next();
        let mut node = other.head.next();
        while node != other.tail {
            // Skip past everything in self that node doesn't strictly precede, so ties go to
            // self.
            while current != self.tail && !(node.value() < current.value()) {
                current = current.next();
            }

            let next = node.next();
            NodePtr::join(current.prev(), node);
            NodePtr::join(node, current);
            node = next;
        }

        self.len += mem::replace(&mut other.len, 0);
        NodePtr::join(other.head, other.tail);
    }

    /// Removes and drops every element equal to `value`, returning the number removed.
    pub fn remove(&mut self, value: &T) -> usize where T: PartialEq {
        self.remove_if(|item| item == value)
    }

    /// Removes and drops every element for which `pred` returns true, returning the number
    /// removed.
    ///
    /// All matching nodes are unlinked before any of them is dropped, so `pred` only ever sees
    /// live elements and no element is dropped mid-scan.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, mut pred: F) -> usize {
        // Unlinked nodes are chained together through their next links.
        let mut removed = NodePtr::dangling();
        let mut count = 0;

        let mut node = self.head.next();
        while node != self.tail {
            let next = node.next();
            if pred(node.value()) {
                self.unlink(node);
                node.set_next(removed);
                removed = node;
                count += 1;
            }
            node = next;
        }

        for _ in 0..count {
            let next = removed.next();
            // SAFETY: removed is one of the element nodes unlinked above, each of which is
            // destroyed exactly once.
            unsafe { self.destroy_node(removed); }
            removed = next;
        }

        count
    }

    /// Reverses the order of the elements in place, by swapping the links of every node and the
    /// roles of the two sentinels.
    pub fn reverse(&mut self) {
        let mut node = self.head;
        loop {
            let next = node.next();
            node.flip();
            if node == self.tail {
                break;
            }
            node = next;
        }
        mem::swap(&mut self.head, &mut self.tail);
    }

    /// Removes every element which is equal to the element directly before it, returning the
    /// number removed. On a sorted list this leaves only distinct elements.
    pub fn unique(&mut self) -> usize where T: PartialEq {
        if self.len < 2 {
            return 0;
        }

        let mut removed = 0;
        let mut kept = self.head.next();
        let mut node = kept.next();
        while node != self.tail {
            let next = node.next();
            if node.value() == kept.value() {
                self.unlink(node);
                // SAFETY: node is an element node which has just been unlinked.
                unsafe { self.destroy_node(node); }
                removed += 1;
            } else {
                kept = node;
            }
            node = next;
        }
        removed
    }

    /// Sorts the list in non-decreasing order. The sort is stable.
    ///
    /// This is a recursive merge sort: the list is split in half by count into two temporary
    /// lists, each half is sorted, and the halves are merged back into this list. Only links are
    /// changed, so positions stay valid.
    ///
    /// # Panics
    /// Panics if the sentinels of a temporary list can't be allocated.
    pub fn sort(&mut self) where T: PartialOrd, A: Clone {
        self.try_sort().throw()
    }

    /// Sorts the list in non-decreasing order, returning an [`Err`] if the sentinels of a
    /// temporary list can't be allocated. On failure the list holds the same elements, in an
    /// unspecified order.
    pub fn try_sort(&mut self) -> Result<(), AllocError> where T: PartialOrd, A: Clone {
        if self.len < 2 {
            return Ok(());
        }

        let mut left = DoublyLinkedList::try_new_in(self.alloc.clone())?;
        let mut right = DoublyLinkedList::try_new_in(self.alloc.clone())?;

        let mid = self.len / 2;
        let first = self.head.next();
        let mut last = first;
        for _ in 1..mid {
            last = last.next();
        }
        left.transfer_before(left.tail, self, first, last, mid);
        right.take_from(self);

        let sorted = left.try_sort().and_then(|()| right.try_sort());

        left.merge(&mut right);
        self.take_from(&mut left);
        sorted
    }
}
