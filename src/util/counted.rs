//! Element types which keep count of what happens to them, for checking that collections drop
//! and clone exactly as often as they should.

use std::cell::Cell;
use std::rc::Rc;

/// Increments a shared counter every time a value is dropped.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<Cell<usize>>);

impl CountedDrop {
    /// Creates a new, independent counter starting at `value`.
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(Cell::new(value)))
    }

    /// Returns the number of drops counted so far.
    pub fn count(&self) -> usize {
        self.0.get()
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Wraps a value and increments a shared counter every time it is cloned. Comparisons only look at
/// the value.
#[derive(Debug)]
pub struct CountedClone<T> {
    /// The wrapped value.
    pub value: T,
    /// The counter shared by every clone.
    pub clones: Rc<Cell<usize>>,
}

impl<T> CountedClone<T> {
    /// Wraps `value`, sharing the provided counter.
    pub fn new(value: T, clones: &Rc<Cell<usize>>) -> CountedClone<T> {
        CountedClone {
            value,
            clones: Rc::clone(clones),
        }
    }
}

impl<T: Clone> Clone for CountedClone<T> {
    fn clone(&self) -> Self {
        self.clones.set(self.clones.get() + 1);
        CountedClone {
            value: self.value.clone(),
            clones: Rc::clone(&self.clones),
        }
    }
}

impl<T: PartialEq> PartialEq for CountedClone<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
