// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observable list-model trait.

use alloc::rc::Rc;

use crate::{Delta, ObserverId};

/// A position-addressable, observable collection of items.
///
/// Implementations are cheap-to-clone shared handles: cloning a model yields
/// another handle onto the same underlying collection, and [`ListModel::is_same`]
/// reports whether two handles share one collection. This mirrors how models
/// are passed around a retained UI: many consumers, one collection.
///
/// Contract:
///
/// - [`ListModel::get`] returns `None` for out-of-range positions; it never
///   panics.
/// - After a mutation, the model settles its own state completely before
///   notifying observers, and emits exactly one [`Delta`] per mutation.
///   Observers see deltas in mutation order, and each delta's pre-change
///   expectations are consistent with the cumulative effect of all deltas
///   delivered before it.
/// - A delta with `removed == 0 && added == 0` is never emitted.
///
/// The item type is carried by the associated `Item` type; consumers that
/// re-expose a model downstream (such as the sort engines) simply re-use it.
pub trait ListModel: Clone + 'static {
    /// The type of the items held by this model.
    type Item: Clone;

    /// Number of items in the model.
    fn len(&self) -> usize;

    /// Returns the item at `position`, or `None` if out of range.
    fn get(&self, position: usize) -> Option<Self::Item>;

    /// Registers a change observer.
    ///
    /// Returns `None` if this model never changes and therefore does not
    /// track observers; mutable models always return `Some`.
    fn observe(&self, observer: Rc<dyn Fn(&Delta)>) -> Option<ObserverId>;

    /// Removes a previously registered change observer.
    ///
    /// Returns `false` if `id` is not (or no longer) registered.
    fn unobserve(&self, id: ObserverId) -> bool;

    /// Returns `true` if `self` and `other` are handles onto the same
    /// underlying collection.
    fn is_same(&self, other: &Self) -> bool;

    /// Returns `true` if the model holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
