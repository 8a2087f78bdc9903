//! Freestanding generic containers.
//!
//! Two containers, both generic over their element type and over where their memory comes from:
//!
//! - [`Vector`], a contiguous growable array.
//! - [`Dictionary`], a map from null-terminated byte strings to values, with a fixed number of
//!   buckets, each of which is a `Vector` of [`Pair`] slots.
//!
//! Memory goes through the [`Allocator`] trait, and the containers only ever use it via the
//! typed [`AllocatorTraits`] surface, so any type implementing `Allocator` can stand in for
//! [`Global`]. The [`iter`] module provides position-style cursors with compile-time category
//! tags, and the generic `advance`/`distance`/`next`/`prev` algorithms that dispatch on them.
//!
//! ```text
//! Dictionary<T, N, A>
//! └── [Vector<Pair<KeyBuf<A>, T>, A>; N]   one bucket per hash value
//!     └── RawBuf<_, A>                      block + capacity, freed exactly once
//!         └── A: Allocator                  raw blocks, in-place construct/destroy
//! ```
//!
//! Nothing here is synchronized; a container may move between threads when its contents and
//! allocator can, but concurrent mutation needs outside locking.

pub mod alloc;
pub mod dictionary;
pub mod error;
pub mod iter;
pub mod key;
pub mod pair;
mod raw;
mod search;
pub mod vector;

pub use alloc::{Allocator, AllocatorTraits, Global};
pub use dictionary::Dictionary;
pub use error::{AllocError, ContainerError, Result};
pub use key::{AsKey, KeyBuf};
pub use pair::{make_pair, Pair};
pub use vector::Vector;
