// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change descriptions emitted by observable list models.

/// A contiguous change to an observable list.
///
/// The items that used to occupy `[position, position + removed)` were
/// replaced by `added` new items starting at `position`. Either count may be
/// zero: a pure insertion has `removed == 0`, a pure removal has
/// `added == 0`, and an in-place permutation or replacement has
/// `removed == added`.
///
/// Models never emit a delta with both counts zero; observers may rely on
/// every delivered delta describing an actual change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    /// First position affected by the change.
    pub position: usize,
    /// Number of items removed at `position`.
    pub removed: usize,
    /// Number of items added at `position`.
    pub added: usize,
}

impl Delta {
    /// Creates a delta from its three raw components.
    #[must_use]
    pub const fn new(position: usize, removed: usize, added: usize) -> Self {
        Self {
            position,
            removed,
            added,
        }
    }

    /// A pure insertion of `added` items at `position`.
    #[must_use]
    pub const fn insertion(position: usize, added: usize) -> Self {
        Self::new(position, 0, added)
    }

    /// A pure removal of `removed` items at `position`.
    #[must_use]
    pub const fn removal(position: usize, removed: usize) -> Self {
        Self::new(position, removed, 0)
    }

    /// An in-place replacement or permutation of `count` items at `position`.
    #[must_use]
    pub const fn replacement(position: usize, count: usize) -> Self {
        Self::new(position, count, count)
    }

    /// Returns `true` if this delta describes no change at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.removed == 0 && self.added == 0
    }

    /// One past the last removed position, in pre-change coordinates.
    #[must_use]
    pub const fn removed_end(&self) -> usize {
        self.position + self.removed
    }

    /// One past the last added position, in post-change coordinates.
    #[must_use]
    pub const fn added_end(&self) -> usize {
        self.position + self.added
    }
}

#[cfg(test)]
mod tests {
    use super::Delta;

    #[test]
    fn constructors_and_ends() {
        let d = Delta::new(3, 2, 5);
        assert_eq!(d.removed_end(), 5);
        assert_eq!(d.added_end(), 8);
        assert!(!d.is_empty());

        assert_eq!(Delta::insertion(1, 4), Delta::new(1, 0, 4));
        assert_eq!(Delta::removal(1, 4), Delta::new(1, 4, 0));
        assert_eq!(Delta::replacement(2, 3), Delta::new(2, 3, 3));
        assert!(Delta::new(7, 0, 0).is_empty());
    }
}
