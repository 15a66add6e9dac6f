// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sorter trait and its classification types.

use alloc::rc::Rc;
use core::cmp::Ordering;

use windrow_list_model::ObserverId;

/// A sorter's self-declared coarse ordering capability.
///
/// Consumers use this to decide whether maintaining a sorted projection is
/// worthwhile at all: a sorter declaring [`OrderClass::None`] compares every
/// pair of items as equal, so the identity order is already "sorted" and a
/// sort stage can stay in pass-through mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderClass {
    /// No ordering: all items compare equal.
    None,
    /// A partial order: some item pairs compare equal by design.
    Partial,
    /// A total order.
    Total,
}

impl OrderClass {
    /// Returns `true` if the sorter imposes a real order.
    #[must_use]
    pub const fn orders(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// How a sorter's comparison just changed, carried by change notifications.
///
/// The classification lets consumers skip work: [`SorterChange::Unchanged`]
/// swaps must not cause a visible reshuffle, and [`SorterChange::SameGrouping`]
/// changes preserve which items compare equal even though their order may
/// differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SorterChange {
    /// The comparison changed in a way that does not affect the order.
    Unchanged,
    /// The order changed, but items that compared equal still compare equal.
    SameGrouping,
    /// The order may have changed arbitrarily.
    Different,
}

/// A three-way comparison between items, with change observation.
///
/// Like list models, sorters are cheap-to-clone shared handles;
/// [`Sorter::is_same`] reports whether two handles share one underlying
/// comparison, which consumers use to turn redundant re-installation into a
/// no-op.
///
/// Sorters whose comparison can never change (such as [`crate::NaturalSorter`])
/// keep the default no-op observation methods.
pub trait Sorter: Clone + 'static {
    /// The type of the items being compared.
    type Item;

    /// Compares two items.
    fn compare(&self, a: &Self::Item, b: &Self::Item) -> Ordering;

    /// The coarse ordering capability currently declared by this sorter.
    fn order(&self) -> OrderClass {
        OrderClass::Total
    }

    /// Registers an observer notified when the comparison itself changes.
    ///
    /// Returns `None` if this sorter never changes and does not track
    /// observers.
    fn observe(&self, observer: Rc<dyn Fn(&SorterChange)>) -> Option<ObserverId> {
        let _ = observer;
        None
    }

    /// Removes a previously registered change observer.
    fn unobserve(&self, id: ObserverId) -> bool {
        let _ = id;
        false
    }

    /// Returns `true` if `self` and `other` are handles onto the same
    /// underlying comparison.
    fn is_same(&self, other: &Self) -> bool;
}
