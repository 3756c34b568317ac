#![cfg(test)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::hash::{BuildHasher, RandomState};
use std::iter;
use std::rc::Rc;

use proptest::prelude::*;

use super::*;
use crate::alloc::{Allocator, Tracking};
use crate::util::counted::{CountedClone, CountedDrop};
use crate::util::panic::assert_panics;

/// A value which is ordered and compared by `key` alone, with `tag` recording where it came from.
#[derive(Debug, Clone, Copy)]
struct Tagged {
    key: u32,
    tag: u32,
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.key.partial_cmp(&other.key)
    }
}

const fn tagged(key: u32, tag: u32) -> Tagged {
    Tagged { key, tag }
}

/// A single mutation applied to both a list and a [`VecDeque`] model. Indices are reduced modulo
/// the current length when applied.
#[derive(Debug, Clone)]
enum Op {
    PushBack(u32),
    PushFront(u32),
    PopBack,
    PopFront,
    Insert(usize, u32),
    Erase(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::PushBack),
        any::<u32>().prop_map(Op::PushFront),
        Just(Op::PopBack),
        Just(Op::PopFront),
        (any::<usize>(), any::<u32>()).prop_map(|(index, value)| Op::Insert(index, value)),
        any::<usize>().prop_map(Op::Erase),
    ]
}

fn assert_contents<T: PartialEq + std::fmt::Debug, A: Allocator>(
    list: &DoublyLinkedList<T, A>,
    expected: &[T],
) {
    list.verify_links();
    assert_eq!(list.len(), expected.len(), "Length should match: {list}");
    assert!(list.iter().eq(expected.iter()), "Forward contents should match: {list}");
    assert!(
        list.iter().rev().eq(expected.iter().rev()),
        "Backward contents should match: {list}"
    );
}

fn tags<A: Allocator>(list: &DoublyLinkedList<Tagged, A>) -> Vec<(u32, u32)> {
    list.iter().map(|t| (t.key, t.tag)).collect()
}

#[test]
fn test_new_list_is_empty() {
    let list = DoublyLinkedList::<u32>::new();
    assert_contents(&list, &[]);
    assert!(list.is_empty());
    assert_eq!(list.begin(), list.end(), "Begin should be end for an empty list.");
    assert_eq!(list.front(), None);
    assert_eq!(list.back(), None);
    assert!(list.max_len() > 0);
}

#[test]
fn test_push_and_pop() {
    let mut list = DoublyLinkedList::new();
    list.push_back(2);
    list.push_back(3);
    list.push_front(1);
    assert_contents(&list, &[1, 2, 3]);
    assert_eq!(list.front(), Some(&1));
    assert_eq!(list.back(), Some(&3));

    *list.front_mut().unwrap() = 10;
    *list.back_mut().unwrap() = 30;
    assert_contents(&list, &[10, 2, 30]);

    assert_eq!(list.pop_front(), Some(10));
    assert_eq!(list.pop_back(), Some(30));
    assert_eq!(list.pop_back(), Some(2));
    assert_contents(&list, &[]);

    assert_eq!(list.pop_back(), None, "Popping an empty list should do nothing.");
    assert_eq!(list.pop_front(), None, "Popping an empty list should do nothing.");
    assert_contents(&list, &[]);
}

#[test]
fn test_repeat_constructors() {
    let list = DoublyLinkedList::repeat("ea", 3);
    assert_contents(&list, &["ea", "ea", "ea"]);

    let list = DoublyLinkedList::<u32>::repeat_default(4);
    assert_contents(&list, &[0, 0, 0, 0]);

    let list = DoublyLinkedList::repeat(7, 0);
    assert_contents(&list, &[]);
}

#[test]
fn test_insert_and_erase_at_positions() {
    let mut list: DoublyLinkedList<u32> = [2, 4].into_iter().collect();

    // SAFETY: Every position used below comes from this list and is only used while valid.
    unsafe {
        let front = list.insert(list.begin(), 1);
        assert_eq!(list.get(front), Some(&1));
        let back = list.insert(list.end(), 5);
        assert_eq!(list.get(back), Some(&5));

        let four = list.prev_position(back);
        let three = list.insert(four, 3);
        assert_contents(&list, &[1, 2, 3, 4, 5]);
        assert_eq!(list.next_position(three), four);

        let after = list.erase(three);
        assert_eq!(after, four, "Erase should return the following position.");
        assert_contents(&list, &[1, 2, 4, 5]);

        let end = list.end();
        assert_eq!(list.erase(end), end, "Erasing end should do nothing.");
        assert_eq!(list.get(end), None, "The sentinel has no value.");
        assert_eq!(list.next_position(end), end, "Nothing follows end.");
        assert_contents(&list, &[1, 2, 4, 5]);
    }
}

#[test]
fn test_insert_repeat() {
    let mut list: DoublyLinkedList<u32> = [1, 5].into_iter().collect();

    // SAFETY: Every position used below comes from this list and is only used while valid.
    unsafe {
        let five = list.prev_position(list.end());
        let last = list.insert_repeat(five, 3, 3);
        assert_contents(&list, &[1, 3, 3, 3, 5]);
        assert_eq!(list.next_position(last), five, "Should return the last inserted element.");

        let unchanged = list.insert_repeat(five, 9, 0);
        assert_eq!(unchanged, five, "Inserting nothing should return pos.");
        assert_contents(&list, &[1, 3, 3, 3, 5]);
    }
}

#[test]
fn test_erase_range() {
    let mut list: DoublyLinkedList<u32> = (0..6).collect();
    let positions: Vec<_> = list.positions().collect();

    // SAFETY: Every position used below comes from this list and is only used while valid.
    unsafe {
        let next = list.erase_range(positions[1], positions[4]);
        assert_eq!(next, positions[4]);
        assert_contents(&list, &[0, 4, 5]);

        let next = list.erase_range(positions[4], positions[4]);
        assert_eq!(next, positions[4], "An empty range should erase nothing.");
        assert_contents(&list, &[0, 4, 5]);

        let end = list.erase_range(list.begin(), list.end());
        assert_eq!(end, list.end());
        assert_contents(&list, &[]);
    }
}

#[test]
fn test_erase_range_from_leading_sentinel() {
    let mut list: DoublyLinkedList<u32> = (0..4).collect();

    // SAFETY: Every position used below comes from this list and is only used while valid.
    unsafe {
        let head = list.prev_position(list.begin());
        let two = list.positions().nth(2).unwrap();
        assert_eq!(list.erase_range(head, two), two);
        assert_contents(&list, &[2, 3]);

        assert_eq!(list.erase_range(head, head), head, "An empty range should erase nothing.");
        assert_contents(&list, &[2, 3]);

        let end = list.erase_range(head, list.end());
        assert_eq!(end, list.end(), "The whole list should be erased.");
        assert_contents(&list, &[]);
    }
}

#[test]
fn test_erasing_keeps_other_positions_valid() {
    let cases: &[&[usize]] = &[
        &[],
        &[0],
        &[5],
        &[2],
        &[0, 5],
        &[1, 2, 3],
        &[4, 0, 2],
        &[0, 1, 2, 3, 4, 5],
    ];

    for erased in cases {
        let mut list: DoublyLinkedList<u32> = (0..6).collect();
        let positions: Vec<_> = list.positions().collect();
        list.push_back(100);

        for &index in erased.iter() {
            // SAFETY: Each position is erased at most once.
            unsafe { list.erase(positions[index]); }
        }

        for (index, pos) in positions.iter().enumerate() {
            if erased.contains(&index) {
                continue;
            }
            assert_eq!(
                // SAFETY: This position wasn't erased.
                unsafe { list.get(*pos) },
                Some(&(index as u32)),
                "Position {index} should survive erasing {erased:?}."
            );
        }

        let expected: Vec<u32> = (0..6)
            .filter(|i| !erased.contains(&(*i as usize)))
            .chain(iter::once(100))
            .collect();
        assert_contents(&list, &expected);
    }
}

#[test]
fn test_emplace() {
    let mut list = DoublyLinkedList::new();
    list.emplace_back_with(|| String::from("b"));
    list.emplace_front_with(|| String::from("a"));
    // SAFETY: end belongs to this list.
    let pos = unsafe { list.emplace_with(list.end(), || "c".repeat(2)) };
    assert_contents(&list, &["a".to_owned(), "b".to_owned(), "cc".to_owned()]);
    // SAFETY: pos was just returned by this list.
    assert_eq!(unsafe { list.get(pos) }.map(String::as_str), Some("cc"));

    let alloc = Tracking::new();
    let mut list = DoublyLinkedList::new_in(&alloc);
    alloc.allow(0);
    let mut called = false;
    let result = list.try_emplace_back_with(|| {
        called = true;
        5
    });
    assert!(result.is_err());
    assert!(!called, "The constructor shouldn't run if allocation fails.");
    assert_contents(&list, &[]);
}

#[test]
fn test_resize() {
    let mut list: DoublyLinkedList<u32> = [1, 2].into_iter().collect();
    list.resize(4);
    assert_contents(&list, &[1, 2, 0, 0]);

    list.resize(1);
    assert_contents(&list, &[1]);

    let mut next = 5;
    list.resize_with(3, || {
        next += 1;
        next
    });
    assert_contents(&list, &[1, 6, 7]);

    list.resize(0);
    assert_contents(&list, &[]);
}

#[test]
fn test_clear_and_drop() {
    let counter = CountedDrop::new(0);
    let mut list: DoublyLinkedList<CountedDrop> =
        iter::repeat_with(|| counter.clone()).take(10).collect();

    list.clear();
    assert_eq!(counter.count(), 10, "10 elements should have been dropped.");
    assert!(list.is_empty());

    list.extend(iter::repeat_with(|| counter.clone()).take(5));
    drop(list);
    assert_eq!(counter.count(), 15, "5 more elements should have been dropped.");
}

#[test]
fn test_allocator_usage() {
    let alloc = Tracking::new();
    {
        let mut list = DoublyLinkedList::new_in(&alloc);
        assert_eq!(alloc.live(), 2, "Only the sentinels should be allocated.");

        list.extend([1, 2, 3]);
        assert_eq!(alloc.live(), 5);

        list.pop_front();
        assert_eq!(alloc.live(), 4);

        list.sort();
        assert_eq!(alloc.live(), 4, "Sorting shouldn't leak temporary sentinels.");
    }
    assert_eq!(alloc.live(), 0, "Dropping the list should free every node.");
}

#[test]
fn test_allocation_failure_leaves_list_unchanged() {
    let alloc = Tracking::new();

    alloc.allow(1);
    assert!(
        DoublyLinkedList::<u32, _>::try_new_in(&alloc).is_err(),
        "The second sentinel shouldn't fit."
    );
    assert_eq!(alloc.live(), 0, "The first sentinel should be freed again.");
    alloc.set_limit(None);

    let mut list = DoublyLinkedList::new_in(&alloc);
    list.extend([1, 2, 3]);
    let positions: Vec<_> = list.positions().collect();

    alloc.allow(0);
    assert!(list.try_push_back(4).is_err());
    assert!(list.try_push_front(0).is_err());
    // SAFETY: positions[1] belongs to this list.
    assert!(unsafe { list.try_insert(positions[1], 9) }.is_err());
    assert!(list.try_resize(5).is_err());
    assert!(list.try_clone().is_err());
    assert!(list.try_take().is_err());
    assert_contents(&list, &[1, 2, 3]);

    assert_panics!({ list.push_back(4) }, "push_back should panic when allocation fails");
    assert_contents(&list, &[1, 2, 3]);

    alloc.set_limit(None);
    list.push_back(4);
    assert_contents(&list, &[1, 2, 3, 4]);
}

#[test]
fn test_partial_allocation_failure_leaves_list_unchanged() {
    let alloc = Tracking::new();
    let mut list = DoublyLinkedList::new_in(&alloc);
    list.extend([1, 2, 3]);
    let live = alloc.live();

    alloc.allow(1);
    assert!(list.try_resize(5).is_err(), "Only one of two nodes fits.");
    assert_contents(&list, &[1, 2, 3]);
    assert_eq!(alloc.live(), live, "The node that did fit should be freed again.");

    alloc.allow(2);
    // SAFETY: end belongs to this list.
    assert!(unsafe { list.try_insert_repeat(list.end(), 9, 3) }.is_err());
    assert_contents(&list, &[1, 2, 3]);
    assert_eq!(alloc.live(), live);

    let counter = CountedDrop::new(0);
    let mut counted = DoublyLinkedList::new_in(&alloc);
    alloc.set_limit(None);
    counted.push_back(counter.clone());
    alloc.allow(2);
    assert!(counted.try_resize_with(4, || counter.clone()).is_err());
    assert_eq!(counted.len(), 1);
    assert_eq!(counter.count(), 3, "Values produced for the failed resize should be dropped.");

    alloc.set_limit(None);
    list.resize(5);
    assert_contents(&list, &[1, 2, 3, 0, 0]);
}

#[test]
fn test_repeat_allocation_failure() {
    let alloc = Tracking::new();
    alloc.allow(4);
    assert!(DoublyLinkedList::try_repeat_in(7, 3, &alloc).is_err());
    assert_eq!(alloc.live(), 0, "Nothing should be leaked.");

    alloc.allow(5);
    let list = DoublyLinkedList::try_repeat_in(7, 3, &alloc).unwrap();
    assert_contents(&list, &[7, 7, 7]);
}

#[test]
fn test_nodes_move_between_allocator_values() {
    let shared = Tracking::new();
    let first = Tracking::wrap(&shared);
    let second = Tracking::wrap(&shared);
    {
        let mut a = DoublyLinkedList::new_in(&first);
        let mut b = DoublyLinkedList::new_in(&second);
        a.extend([1, 4]);
        b.extend([2, 3, 5]);
        assert_eq!(first.live(), 4);
        assert_eq!(second.live(), 5);

        a.merge(&mut b);
        assert_contents(&a, &[1, 2, 3, 4, 5]);

        let mut c = DoublyLinkedList::new_in(&second);
        c.push_back(6);
        a.append(&mut c);
        a.swap(&mut b);
        assert_contents(&b, &[1, 2, 3, 4, 5, 6]);
        assert_contents(&a, &[]);

        // Nodes allocated through second, freed through first.
        assert_eq!(b.remove_if(|value| value % 2 == 1), 3);
        assert_contents(&b, &[2, 4, 6]);
        assert_eq!(shared.live(), 9, "Exactly the removed nodes should be freed.");
    }
    assert_eq!(shared.live(), 0, "Every node should be freed exactly once.");
    assert_eq!(shared.total(), 12);
    assert_eq!(first.total() + second.total(), shared.total());
}

#[test]
fn test_clone_from_allocation_failure() {
    let alloc = Tracking::new();
    let mut target = DoublyLinkedList::new_in(&alloc);
    target.extend([7, 8]);
    let source: DoublyLinkedList<i32, _> = DoublyLinkedList::repeat_in(1, 3, &alloc);

    alloc.allow(2);
    assert!(target.try_clone_from(&source).is_err());
    assert_contents(&target, &[7, 8]);

    alloc.set_limit(None);
    target.try_clone_from(&source).unwrap();
    assert_contents(&target, &[1, 1, 1]);
}

#[test]
fn test_clone() {
    let clones = Rc::new(Cell::new(0));
    let list: DoublyLinkedList<_> = (0..4).map(|i| CountedClone::new(i, &clones)).collect();

    let mut copy = list.clone();
    assert_eq!(clones.get(), 4, "Every element should be cloned once.");
    assert!(copy == list);

    copy.pop_front();
    *copy.front_mut().unwrap() = CountedClone::new(10, &clones);
    assert_eq!(list.front().unwrap().value, 0, "The copy should be independent.");
    assert_eq!(list.len(), 4);

    let mut target: DoublyLinkedList<_> = iter::once(CountedClone::new(99, &clones)).collect();
    target.clone_from(&copy);
    assert!(target == copy, "clone_from should replace the contents.");
    target.verify_links();
}

#[test]
fn test_take_moves_without_cloning() {
    let clones = Rc::new(Cell::new(0));
    let mut source: DoublyLinkedList<_> = (0..5).map(|i| CountedClone::new(i, &clones)).collect();
    let positions: Vec<_> = source.positions().collect();

    let taken = source.take();
    assert_eq!(clones.get(), 0, "Taking shouldn't clone any element.");
    assert!(source.is_empty());
    assert_eq!(source.begin(), source.end());
    source.verify_links();
    assert!(taken.iter().map(|c| c.value).eq(0..5));
    taken.verify_links();
    // SAFETY: The nodes now belong to taken.
    assert_eq!(unsafe { taken.get(positions[2]) }.map(|c| c.value), Some(2));

    let mut target: DoublyLinkedList<_> =
        (10..12).map(|i| CountedClone::new(i, &clones)).collect();
    let mut taken = taken;
    target.take_from(&mut taken);
    assert_eq!(clones.get(), 0, "take_from shouldn't clone any element.");
    assert!(taken.is_empty());
    assert_eq!(taken.begin(), taken.end());
    assert!(target.iter().map(|c| c.value).eq(0..5), "Old contents should be replaced.");
    target.verify_links();
}

#[test]
fn test_swap() {
    let mut a: DoublyLinkedList<u32> = (0..3).collect();
    let mut b: DoublyLinkedList<u32> = (10..12).collect();
    let a_positions: Vec<_> = a.positions().collect();

    a.swap(&mut b);
    assert_contents(&a, &[10, 11]);
    assert_contents(&b, &[0, 1, 2]);

    // SAFETY: The nodes of a were swapped into b without being erased.
    unsafe {
        assert_eq!(b.get(a_positions[1]), Some(&1));
        b.erase(a_positions[1]);
    }
    assert_contents(&b, &[0, 2]);
}

#[test]
fn test_merge() {
    let mut a: DoublyLinkedList<u32> = [1, 3, 5].into_iter().collect();
    let mut b: DoublyLinkedList<u32> = [2, 4, 6].into_iter().collect();
    a.merge(&mut b);
    assert_contents(&a, &[1, 2, 3, 4, 5, 6]);
    assert_contents(&b, &[]);

    let mut empty = DoublyLinkedList::new();
    empty.merge(&mut a);
    assert_contents(&empty, &[1, 2, 3, 4, 5, 6]);
    empty.merge(&mut a);
    assert_contents(&empty, &[1, 2, 3, 4, 5, 6]);

    let mut low: DoublyLinkedList<u32> = [7, 8].into_iter().collect();
    let mut high: DoublyLinkedList<u32> = [1, 2].into_iter().collect();
    low.merge(&mut high);
    assert_contents(&low, &[1, 2, 7, 8]);
}

#[test]
fn test_merge_ties_favour_self() {
    let mut a: DoublyLinkedList<Tagged> =
        [tagged(1, 0), tagged(2, 0), tagged(2, 1)].into_iter().collect();
    let mut b: DoublyLinkedList<Tagged> = [tagged(2, 10), tagged(3, 10)].into_iter().collect();
    let b_positions: Vec<_> = b.positions().collect();

    a.merge(&mut b);
    a.verify_links();
    assert_eq!(
        tags(&a),
        [(1, 0), (2, 0), (2, 1), (2, 10), (3, 10)],
        "Equal elements of self should come before those of other."
    );
    assert!(b.is_empty());

    // SAFETY: Merging relinks the nodes of b into a.
    assert_eq!(unsafe { a.get(b_positions[0]) }.map(|t| t.tag), Some(10));

    let mut c: DoublyLinkedList<Tagged> = [tagged(2, 20), tagged(2, 21)].into_iter().collect();
    let mut d: DoublyLinkedList<Tagged> = [tagged(2, 30), tagged(2, 31)].into_iter().collect();
    c.merge(&mut d);
    assert_eq!(tags(&c), [(2, 20), (2, 21), (2, 30), (2, 31)]);
}

#[test]
fn test_splice() {
    let mut list: DoublyLinkedList<u32> = [1, 2, 3].into_iter().collect();
    let mut empty = DoublyLinkedList::new();

    // SAFETY: begin belongs to list.
    unsafe { list.splice(list.begin(), &mut empty); }
    assert_contents(&list, &[1, 2, 3]);

    let mut tail: DoublyLinkedList<u32> = [4, 5].into_iter().collect();
    let four = tail.begin();
    // SAFETY: end belongs to list.
    unsafe { list.splice(list.end(), &mut tail); }
    assert_contents(&list, &[1, 2, 3, 4, 5]);
    assert_contents(&tail, &[]);
    // SAFETY: The node holding 4 is now part of list.
    assert_eq!(unsafe { list.get(four) }, Some(&4));

    let mut middle: DoublyLinkedList<u32> = [10, 11].into_iter().collect();
    // SAFETY: four belongs to list.
    unsafe { list.splice(four, &mut middle); }
    assert_contents(&list, &[1, 2, 3, 10, 11, 4, 5]);

    let mut front: DoublyLinkedList<u32> = [0].into_iter().collect();
    list.prepend(&mut front);
    let mut back: DoublyLinkedList<u32> = [6].into_iter().collect();
    list.append(&mut back);
    assert_contents(&list, &[0, 1, 2, 3, 10, 11, 4, 5, 6]);
    assert!(front.is_empty() && back.is_empty());

    let mut into_empty = DoublyLinkedList::new();
    into_empty.append(&mut list);
    assert_contents(&into_empty, &[0, 1, 2, 3, 10, 11, 4, 5, 6]);
    assert_contents(&list, &[]);
}

#[test]
fn test_remove() {
    let counter = CountedDrop::new(0);
    let mut list: DoublyLinkedList<(u32, CountedDrop)> = [1, 2, 1, 3, 1]
        .into_iter()
        .map(|i| (i, counter.clone()))
        .collect();

    assert_eq!(list.remove_if(|(i, _)| *i == 1), 3);
    assert_eq!(counter.count(), 3, "Exactly the removed elements should be dropped.");
    assert!(list.iter().map(|(i, _)| *i).eq([2, 3]));
    list.verify_links();

    let mut list: DoublyLinkedList<u32> = [5, 1, 5, 5, 2, 5].into_iter().collect();
    let front = *list.front().unwrap();
    assert_eq!(list.remove(&front), 4);
    assert_contents(&list, &[1, 2]);
    assert_eq!(list.remove(&7), 0);
    assert_contents(&list, &[1, 2]);

    let mut list: DoublyLinkedList<u32> = iter::repeat_n(3, 4).collect();
    assert_eq!(list.remove(&3), 4);
    assert_contents(&list, &[]);
}

#[test]
fn test_reverse() {
    let mut list: DoublyLinkedList<u32> = (0..5).collect();
    let positions: Vec<_> = list.positions().collect();

    list.reverse();
    assert_contents(&list, &[4, 3, 2, 1, 0]);
    // SAFETY: Reversing doesn't erase anything.
    unsafe {
        assert_eq!(list.get(positions[0]), Some(&0));
        assert_eq!(list.next_position(positions[0]), list.end());
    }

    list.push_back(9);
    list.push_front(8);
    assert_contents(&list, &[8, 4, 3, 2, 1, 0, 9]);

    list.reverse();
    list.reverse();
    assert_contents(&list, &[8, 4, 3, 2, 1, 0, 9]);

    let mut empty = DoublyLinkedList::<u32>::new();
    empty.reverse();
    assert_contents(&empty, &[]);
    empty.push_back(1);
    empty.reverse();
    assert_contents(&empty, &[1]);
}

#[test]
fn test_unique() {
    let mut list: DoublyLinkedList<u32> = [1, 1, 2, 2, 2, 3].into_iter().collect();
    assert_eq!(list.unique(), 3);
    assert_contents(&list, &[1, 2, 3]);
    assert_eq!(list.unique(), 0, "unique should be idempotent.");
    assert_contents(&list, &[1, 2, 3]);

    let mut list: DoublyLinkedList<u32> = [1, 2, 1, 1, 3, 1].into_iter().collect();
    list.unique();
    assert_contents(&list, &[1, 2, 1, 3, 1]);

    let mut list: DoublyLinkedList<u32> = iter::repeat_n(7, 5).collect();
    list.unique();
    assert_contents(&list, &[7]);
}

#[test]
fn test_sort() {
    let mut list: DoublyLinkedList<u32> = [3, 1, 2].into_iter().collect();
    list.sort();
    assert_contents(&list, &[1, 2, 3]);

    let mut list = DoublyLinkedList::<u32>::new();
    list.sort();
    assert_contents(&list, &[]);

    let mut list: DoublyLinkedList<Tagged> = [
        tagged(2, 0), tagged(1, 1), tagged(2, 2), tagged(0, 3), tagged(1, 4), tagged(2, 5),
    ].into_iter().collect();
    let positions: Vec<_> = list.positions().collect();
    list.sort();
    list.verify_links();
    assert_eq!(
        tags(&list),
        [(0, 3), (1, 1), (1, 4), (2, 0), (2, 2), (2, 5)],
        "Sorting should be stable."
    );
    // SAFETY: Sorting only relinks nodes.
    assert_eq!(unsafe { list.get(positions[3]) }.map(|t| t.tag), Some(3));
}

#[test]
fn test_sort_allocation_failure() {
    let alloc = Tracking::new();
    let mut list = DoublyLinkedList::new_in(&alloc);
    list.extend([4, 2, 3, 1]);
    assert_eq!(alloc.live(), 6);

    alloc.allow(0);
    assert!(list.try_sort().is_err());
    assert_contents(&list, &[4, 2, 3, 1]);

    // Enough for the first split, but not the second level.
    alloc.allow(2);
    assert!(list.try_sort().is_err());
    alloc.set_limit(None);
    list.verify_links();
    let mut values: Vec<_> = list.iter().copied().collect();
    values.sort();
    assert_eq!(values, [1, 2, 3, 4], "No element should be lost.");
    assert_eq!(alloc.live(), 6, "Temporary lists should be freed.");

    list.sort();
    assert_contents(&list, &[1, 2, 3, 4]);
}

proptest! {
    #[test]
    fn test_random_operations_stay_consistent(ops in prop::collection::vec(op(), 0..200)) {
        let mut list = DoublyLinkedList::new();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                Op::PushBack(value) => {
                    list.push_back(value);
                    model.push_back(value);
                },
                Op::PushFront(value) => {
                    list.push_front(value);
                    model.push_front(value);
                },
                Op::PopBack => prop_assert_eq!(list.pop_back(), model.pop_back()),
                Op::PopFront => prop_assert_eq!(list.pop_front(), model.pop_front()),
                Op::Insert(index, value) => {
                    let index = index % (model.len() + 1);
                    let pos = list.positions().nth(index).unwrap_or(list.end());
                    // SAFETY: pos was just obtained from this list.
                    let inserted = unsafe { list.insert(pos, value) };
                    model.insert(index, value);
                    // SAFETY: inserted was just returned by this list.
                    prop_assert_eq!(unsafe { list.get(inserted) }, Some(&value));
                },
                Op::Erase(index) => {
                    if !model.is_empty() {
                        let index = index % model.len();
                        let pos = list.positions().nth(index).unwrap();
                        // SAFETY: pos was just obtained from this list.
                        unsafe { list.erase(pos); }
                        model.remove(index);
                    }
                },
            }

            list.verify_links();
            prop_assert_eq!(list.len(), model.len());
            prop_assert!(list.iter().eq(model.iter()), "List should match the model: {}", list);
        }
    }

    #[test]
    fn test_sort_matches_stable_reference(keys in prop::collection::vec(0..6_u32, 0..64)) {
        let values: Vec<Tagged> = keys
            .iter()
            .enumerate()
            .map(|(tag, key)| tagged(*key, tag as u32))
            .collect();

        let mut list: DoublyLinkedList<Tagged> = values.iter().copied().collect();
        list.sort();
        list.verify_links();

        let mut expected = values;
        expected.sort_by(|a, b| a.key.cmp(&b.key));
        let expected: Vec<_> = expected.iter().map(|t| (t.key, t.tag)).collect();
        prop_assert_eq!(tags(&list), expected, "Sorting should match a stable sort.");
    }

    #[test]
    fn test_reverse_twice_is_identity(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let mut list: DoublyLinkedList<u32> = values.iter().copied().collect();
        list.reverse();
        prop_assert!(list.iter().eq(values.iter().rev()));
        list.reverse();
        list.verify_links();
        prop_assert!(list.iter().eq(values.iter()));
    }
}

#[test]
fn test_iterators() {
    let mut list: DoublyLinkedList<u32> = (0..5).collect();
    assert_eq!(list.iter().len(), 5);
    assert!(list.iter().rev().copied().eq((0..5).rev()));

    let mut iter = list.iter();
    assert_eq!(iter.next(), Some(&0));
    assert_eq!(iter.next_back(), Some(&4));
    assert_eq!(iter.len(), 3);
    assert!(iter.eq([1, 2, 3].iter()));

    for value in list.iter_mut() {
        *value *= 2;
    }
    for value in list.iter_mut().rev().take(1) {
        *value += 1;
    }
    assert_contents(&list, &[0, 2, 4, 6, 9]);

    assert_eq!(list.positions().len(), 5);
    // SAFETY: Positions come from this list.
    let values = list.positions().rev().map(|pos| unsafe { *list.get(pos).unwrap() });
    assert!(values.eq([9, 6, 4, 2, 0]));

    let mut owned = list.into_iter();
    assert_eq!(owned.next_back(), Some(9));
    assert_eq!(owned.next(), Some(0));
    assert_eq!(owned.len(), 3);
    assert!(owned.eq([2, 4, 6]));
}

#[test]
fn test_equality_and_hash() {
    let list: DoublyLinkedList<u32> = (0..5).collect();
    let same: DoublyLinkedList<u32> = [0, 1, 2, 3, 4].into_iter().collect();
    assert_eq!(list, same, "Different construction methods should produce equal results.");
    let changed: DoublyLinkedList<u32> = [0, 1, 2, 5, 4].into_iter().collect();
    let shorter: DoublyLinkedList<u32> = (0..4).collect();
    assert_ne!(list, changed, "Lists with different elements shouldn't be equal.");
    assert_ne!(list, shorter, "Lists with different lengths shouldn't be equal.");

    let state = RandomState::new();
    assert_eq!(
        state.hash_one(&list),
        state.hash_one(&same),
        "Equal lists should produce the same hash."
    );
}

#[test]
fn test_formatting() {
    let list: DoublyLinkedList<u32> = (1..4).collect();
    assert_eq!(format!("{list}"), "(1) -> (2) -> (3)");
    assert_eq!(format!("{list:?}"), "DoublyLinkedList { contents: [1, 2, 3], len: 3 }");
    assert_eq!(format!("{}", DoublyLinkedList::<u32>::new()), "()");
}

#[test]
fn test_zst_support() {
    let mut list = DoublyLinkedList::<()>::repeat_default(3);
    assert_eq!(list.len(), 3);
    list.push_back(());
    assert_eq!(list.unique(), 3);
    assert_contents(&list, &[()]);
}
