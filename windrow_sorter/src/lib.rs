// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=windrow_sorter --heading-base-level=0

//! Windrow Sorter: comparison capabilities for list pipelines.
//!
//! This crate defines how Windrow components compare items:
//!
//! - [`Sorter`]: a three-way comparison between items, exposed as a
//!   cheap-clone shared handle with optional change observation.
//! - [`OrderClass`]: a sorter's self-declared coarse capability (no
//!   ordering / partial / total). Consumers use [`OrderClass::None`] to skip
//!   maintaining a sorted projection entirely.
//! - [`SorterChange`]: the classification carried when a sorter's comparison
//!   changes at runtime, letting consumers skip or shrink re-sorts.
//! - [`NaturalSorter`]: ready-made ascending/descending order for [`Ord`]
//!   items.
//! - [`CustomSorter`]: an adapter around an arbitrary comparison function
//!   (optionally closing over owned context), replaceable at runtime.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cmp::Ordering;
//! use windrow_sorter::{CustomSorter, NaturalSorter, Sorter, SorterChange};
//!
//! let natural = NaturalSorter::<u32>::new();
//! assert_eq!(natural.compare(&1, &2), Ordering::Less);
//!
//! // A custom sorter can flip its comparison later; observers hear about it.
//! let by_length = CustomSorter::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
//! assert_eq!(by_length.compare(&"fir", &"spruce"), Ordering::Less);
//! by_length.set_compare(|a, b| b.len().cmp(&a.len()), SorterChange::Different);
//! assert_eq!(by_length.compare(&"fir", &"spruce"), Ordering::Greater);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod custom;
mod natural;
mod sorter;

pub use custom::CustomSorter;
pub use natural::NaturalSorter;
pub use sorter::{OrderClass, Sorter, SorterChange};
