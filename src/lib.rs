//! Order-statistic collections with value semantics.
//!
//! This crate provides [`RankSet`] and [`RankMap`], ordered collections built
//! on a single red-black tree engine augmented with subtree sizes, adding
//! O(log n) positional operations to the usual logarithmic key operations:
//!
//! - [`get_by_rank`](RankSet::get_by_rank) - Get the element at a given sorted position
//! - [`rank_of`](RankSet::rank_of) - Get the sorted position of an element
//! - [`remove_by_rank`](RankSet::remove_by_rank) - Remove the element at a given sorted position
//! - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the first element
//!
//! Both collections behave as plain values: `clone` is O(1) and shares
//! storage until one copy mutates, at which point the mutator takes a private
//! copy and the other holders are left untouched (copy-on-write).
//!
//! # Example
//!
//! ```
//! use rank_tree::{Rank, RankSet};
//!
//! let mut scores = RankSet::new();
//! scores.insert(100);
//! scores.insert(85);
//! scores.insert(92);
//!
//! // Key-based operations, O(log n)
//! assert!(scores.contains(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Positional operations, also O(log n)
//! assert_eq!(scores.get_by_rank(1), Some(&92));
//! assert_eq!(scores.rank_of(&100), Some(2));
//! assert_eq!(scores[Rank(0)], 85);
//!
//! // Cheap copies with copy-on-write isolation
//! let snapshot = scores.clone();
//! scores.remove(&85);
//! assert_eq!(snapshot.len(), 3);
//! assert_eq!(scores.len(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) rank operations** - Select, rank and positional removal via subtree size augmentation
//! - **Value semantics** - O(1) `clone`, copy-on-write promotion on first shared mutation
//! - **Stable positions** - [`Position`] handles survive rebalancing and are
//!   invalidated only by the removal of the element they name, with stale use
//!   detected rather than read through
//! - **Pluggable ordering** - A [`Comparator`] injected at construction time
//!
//! # Implementation
//!
//! The engine is a red-black tree whose nodes live in a generation-stamped
//! arena and link to each other by index, with one always-black sentinel as
//! the uniform leaf and past-the-end marker. Every node tracks the size of
//! its subtree, which is what makes rank queries logarithmic. The façades
//! hold the engine behind a shared reference count and clone the whole arena
//! before the first mutation of shared storage.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod comparator;
mod error;
mod order_statistic;
mod position;
mod raw;

pub mod rank_map;
pub mod rank_set;

pub use comparator::{Comparator, Natural};
pub use error::Error;
pub use order_statistic::{Rank, Ranks};
pub use position::Position;
pub use rank_map::RankMap;
pub use rank_set::RankSet;
