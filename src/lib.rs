//! This crate is my attempt at writing a doubly linked list the way a systems library would: with
//! sentinel nodes, node handles that survive unrelated mutation, and every byte of memory coming
//! from a pluggable allocator.
//!
//! # Purpose
//! This repo / crate is a learning project with no expectation of being used in production. A
//! linked list is the textbook example of a data structure that's awkward in Rust, which is
//! exactly why it's worth writing properly: pointers, ownership transfer between lists,
//! allocation failure and iterator invalidation all have to be dealt with explicitly.
//!
//! # Method
//! [`DoublyLinkedList`](collections::linked::DoublyLinkedList) keeps two sentinel nodes, one at
//! each end, which are allocated with the list and live as long as it does. Every element node
//! therefore has neighbours on both sides, so insertion and removal never branch on the ends of
//! the list. Whole-list algorithms (merge, splice, sort, reverse, unique, remove) only relink
//! nodes, so elements never move in memory once inserted.
//!
//! # Allocation
//! Nothing here calls the global allocator directly. Lists take an
//! [`Allocator`](alloc::Allocator) (defaulting to [`Global`](alloc::Global)) and route every node
//! allocation through it. Each operation that allocates comes in two flavours: `try_*`, which
//! returns an [`AllocError`](alloc::AllocError) and leaves the list untouched, and a panicking
//! version for when handling the error every time would just be noise.
//!
//! # Error Handling
//! When this crate returns errors, it does so with concrete types that implement
//! [`Error`](std::error::Error), rather than boxing them. Precondition violations that can be
//! checked cheaply (popping from an empty list, stepping a cursor past a sentinel) are made
//! harmless instead of being errors. Those that can't be checked without giving up `O(1)`
//! (handing a list a [`Position`](collections::linked::Position) that belongs to another list)
//! are `unsafe` to call.
//!
//! # Dependencies
//! This crate depends on `derive_more` for some derive macros, because they remove the need for
//! some very repetitive programming.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
#[cfg(feature = "collections")]
pub mod collections;

pub(crate) mod util;
