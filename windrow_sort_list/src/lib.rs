// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sorted projections over observable list models.
//!
//! A sort model wraps a [`ListModel`](windrow_list_model::ListModel) and a
//! [`Sorter`](windrow_sorter::Sorter) and exposes the same items in sorted
//! order, itself implementing `ListModel` so projections compose. When the
//! upstream model or the sorter changes, the projection updates itself and
//! notifies its own observers with a
//! [`Delta`](windrow_list_model::Delta) describing the changed positions.
//!
//! Three engines trade simplicity against notification quality and latency:
//!
//! - [`FullSortModel`] rebuilds and re-sorts eagerly on every change and
//!   notifies coarsely. The simplicity baseline.
//! - [`TrackingSortModel`] sorts eagerly but tracks each entry's upstream
//!   position, translating edits into the minimal changed window.
//! - [`IncrementalSortModel`] additionally spreads sorting work over
//!   [`IdleQueue`] turns so that sorting a large collection never blocks the
//!   host's event loop. This is the engine to use.
//!
//! ```
//! use windrow_list_model::{ListModel, VecModel};
//! use windrow_sort_list::{IdleQueue, IncrementalSortModel};
//! use windrow_sorter::NaturalSorter;
//!
//! let queue = IdleQueue::new();
//! let model = VecModel::from_items([3_u32, 1, 2]);
//! let sorted =
//!     IncrementalSortModel::with(&queue, Some(model.clone()), Some(NaturalSorter::new()));
//!
//! queue.drain(); // the host event loop would pump this from idle time
//! assert_eq!(sorted.get(0), Some(1));
//!
//! model.push(0); // settled projections absorb edits without re-sorting
//! assert_eq!(sorted.get(0), Some(0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.
#![no_std]

extern crate alloc;

mod entry;
mod full;
mod idle;
mod incremental;
mod range;
mod tracking;

pub use full::FullSortModel;
pub use idle::{Idle, IdleQueue, TaskId};
pub use incremental::IncrementalSortModel;
pub use tracking::TrackingSortModel;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared helpers for the engine tests.

    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use windrow_list_model::{Delta, ListModel};

    /// Reads every exposed item out of `model`.
    pub(crate) fn contents<M: ListModel>(model: &M) -> Vec<M::Item> {
        (0..model.len()).filter_map(|i| model.get(i)).collect()
    }

    /// Records every delta `model` emits from now on.
    pub(crate) fn record<M: ListModel>(model: &M) -> Rc<RefCell<Vec<Delta>>> {
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let sink = deltas.clone();
        model
            .observe(Rc::new(move |delta: &Delta| {
                sink.borrow_mut().push(*delta);
            }))
            .unwrap();
        deltas
    }

    /// Maintains a replica of `model` purely from its deltas.
    ///
    /// If the replica ever disagrees with the model's actual contents, the
    /// model's notifications were wrong (too narrow, misplaced, or
    /// miscounted) — the strongest consistency check a test can make.
    pub(crate) fn mirror<M: ListModel>(model: &M) -> Rc<RefCell<Vec<M::Item>>> {
        let replica = Rc::new(RefCell::new(contents(model)));
        let sink = replica.clone();
        let probe = model.clone();
        model
            .observe(Rc::new(move |delta: &Delta| {
                let added: Vec<M::Item> = (delta.position..delta.added_end())
                    .map(|i| {
                        probe
                            .get(i)
                            .expect("a delta's added range must be readable")
                    })
                    .collect();
                sink.borrow_mut()
                    .splice(delta.position..delta.removed_end(), added);
            }))
            .unwrap();
        replica
    }
}
