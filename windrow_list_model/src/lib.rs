// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=windrow_list_model --heading-base-level=0

//! Windrow List Model: observable, position-addressable collections.
//!
//! This crate defines the collection contract shared by every stage of a
//! Windrow list pipeline:
//!
//! - [`ListModel`]: a trait for collections addressed by position, exposing
//!   item count, item access, and change observation. Models are cheap-clone
//!   shared handles, so a collection can feed many consumers.
//! - [`Delta`]: the change notification — "`removed` items at `position`
//!   were replaced by `added` items".
//! - [`Observers`]: a small, single-threaded observer registry used by model
//!   implementations (and reusable for other event types).
//! - [`VecModel`]: a mutable vector-backed model for hosts and tests.
//!
//! Components that transform a model (sorting, filtering, slicing) consume
//! this trait upstream and implement it downstream, so stages compose
//! transparently.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use windrow_list_model::{Delta, ListModel, VecModel};
//!
//! let model = VecModel::from_items(["ash", "birch"]);
//!
//! // Watch for changes.
//! let seen: Rc<RefCell<Vec<Delta>>> = Rc::default();
//! let sink = seen.clone();
//! model.observe(Rc::new(move |delta: &Delta| {
//!     sink.borrow_mut().push(*delta);
//! }));
//!
//! model.push("cedar");
//! assert_eq!(model.get(2), Some("cedar"));
//! assert_eq!(*seen.borrow(), vec![Delta::insertion(2, 1)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod delta;
mod model;
mod observers;
mod vec_model;

pub use delta::Delta;
pub use model::ListModel;
pub use observers::{ObserverId, Observers};
pub use vec_model::VecModel;
