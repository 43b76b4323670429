//! Augmented Red-Black tree collections for Rust.
//!
//! This crate provides [`OrderStatTree`] and [`IntervalTree`], two ordered
//! collections built on one shared Red-Black tree core, each augmenting the
//! tree with per-node bookkeeping to answer queries a plain search tree
//! cannot:
//!
//! - [`select`](OrderStatTree::select) - Get the i-th smallest key, O(log n)
//! - [`rank`](OrderStatTree::rank) - Get the sorted position of a key, O(log n)
//! - [`interval_search`](IntervalTree::interval_search) - Find any stored
//!   interval overlapping a query interval, O(log n)
//!
//! # Example
//!
//! ```
//! use cardinal_tree::{IntervalTree, OrderStatTree};
//!
//! let mut ranks = OrderStatTree::new();
//! for key in [41, 38, 31, 12, 19, 8] {
//!     ranks.insert(key);
//! }
//!
//! // Standard ordered-set operations work as expected
//! assert!(ranks.contains(&19));
//! assert_eq!(ranks.minimum(), Ok(&8));
//!
//! // Order-statistic operations (O(log n), rank is 1-based)
//! assert_eq!(ranks.select(1), Ok(&8));
//! assert_eq!(ranks.rank(&31), Ok(4));
//!
//! let mut spans = IntervalTree::new();
//! spans.insert(16, 21);
//! spans.insert(25, 30);
//!
//! // Any one stored interval overlapping [22, 26]
//! let hit = spans.interval_search(22, 26).unwrap();
//! assert!(*hit.low() <= 26 && 22 <= *hit.high());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **O(log n) mutation and queries** - Classical Red-Black rebalancing with
//!   augmentations repaired locally on every rotation
//! - **Arena storage** - Nodes live in a contiguous slot arena addressed by
//!   niche-optimized handles; parent links are plain indices, so no reference
//!   cycles can form and dropping a tree releases every node deterministically
//!
//! # Implementation
//!
//! Both collections share one Red-Black core parameterized by an augmentation:
//! subtree size for [`OrderStatTree`], subtree maximum high endpoint for
//! [`IntervalTree`]. The augmentation is recomputed bottom-up from a node's
//! two children after every structural change - each rotation repairs the two
//! relocated nodes, and each insert or delete walks the affected path back to
//! the root - so queries only ever read values that are already consistent.
//!
//! Neither collection is safe for concurrent mutation; wrap a tree in an
//! exclusive lock if it must be shared across threads.

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

mod error;
mod interval;
mod raw;

pub mod interval_tree;
pub mod order_stat_tree;

pub use error::TreeError;
pub use interval::Interval;
pub use interval_tree::IntervalTree;
pub use order_stat_tree::OrderStatTree;
