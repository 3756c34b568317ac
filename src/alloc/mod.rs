//! Memory allocation for collection nodes.
//!
//! # Purpose
//! Collections in this crate never call into the heap directly. Instead, every allocation and
//! deallocation goes through an [`Allocator`], which defaults to [`Global`] (the system allocator
//! via [`std::alloc`]). Supplying a different allocator is done with the `*_in` constructors of
//! each collection.
//!
//! Rust's own `Allocator` trait is still unstable, so this module provides its own trait with the
//! same basic shape, plus the typed helpers a node-based collection needs (allocate `n` values of
//! some `U`, construct, destroy, deallocate).
//!
//! [`Tracking`] wraps another allocator and records live allocations. It can also be given a
//! limit, after which it refuses to allocate. This is mostly useful for finding leaks and for
//! exercising allocation failure.

mod allocator;
mod error;
mod global;
#[cfg(any(test, feature = "alloc-tracking"))]
mod tracking;

pub use allocator::*;
pub use error::*;
pub use global::*;
#[cfg(any(test, feature = "alloc-tracking"))]
pub use tracking::*;
