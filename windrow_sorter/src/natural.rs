// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A ready-made sorter for items with a natural order.

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;

use crate::Sorter;

/// A [`Sorter`] using the item type's [`Ord`] implementation.
///
/// Stateless and immutable: two `NaturalSorter`s with the same direction are
/// interchangeable, so [`Sorter::is_same`] compares direction rather than
/// identity and re-installing an equal instance stays a no-op.
pub struct NaturalSorter<T> {
    descending: bool,
    _items: PhantomData<fn(&T)>,
}

impl<T> NaturalSorter<T> {
    /// An ascending natural-order sorter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descending: false,
            _items: PhantomData,
        }
    }

    /// A descending natural-order sorter.
    #[must_use]
    pub const fn descending() -> Self {
        Self {
            descending: true,
            _items: PhantomData,
        }
    }

    /// Returns `true` if this sorter orders largest-first.
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        self.descending
    }
}

impl<T> Default for NaturalSorter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NaturalSorter<T> {
    fn clone(&self) -> Self {
        Self {
            descending: self.descending,
            _items: PhantomData,
        }
    }
}

impl<T> Copy for NaturalSorter<T> {}

impl<T> fmt::Debug for NaturalSorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaturalSorter")
            .field("descending", &self.descending)
            .finish()
    }
}

impl<T: Ord + 'static> Sorter for NaturalSorter<T> {
    type Item = T;

    fn compare(&self, a: &T, b: &T) -> Ordering {
        if self.descending {
            b.cmp(a)
        } else {
            a.cmp(b)
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        self.descending == other.descending
    }
}
