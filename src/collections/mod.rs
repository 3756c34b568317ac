//! General-purpose collection types.
//!
//! # Purpose
//! These types exist to learn about the data structures themselves, but also about pointers,
//! allocation through a pluggable [`Allocator`](crate::alloc::Allocator) and iterators.

#[cfg(feature = "linked")]
pub mod linked;
