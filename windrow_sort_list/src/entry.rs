// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backing-array slots shared by the sort engines.

use alloc::vec::Vec;

use windrow_list_model::ListModel;
use windrow_sorter::Sorter;

/// One slot of an engine's backing array: an item plus the upstream position
/// it occupied when the engine last synchronized with its source.
///
/// `source_position` is what lets the incremental engines translate an
/// upstream "removed `[a, b)`, inserted `n` at `a`" notification into stale
/// backing-array slots without re-reading the whole model.
#[derive(Debug, Clone)]
pub(crate) struct SortEntry<T> {
    pub(crate) item: T,
    pub(crate) source_position: usize,
}

/// Reads every item out of `model`, tagged with its current position.
pub(crate) fn collect_entries<M: ListModel>(model: &M) -> Vec<SortEntry<M::Item>> {
    (0..model.len())
        .filter_map(|position| {
            model.get(position).map(|item| SortEntry {
                item,
                source_position: position,
            })
        })
        .collect()
}

/// In-place sort of a backing array under `sorter`, breaking comparison
/// ties on the upstream position.
///
/// Tying on `source_position` pins equal-comparing items to upstream order
/// outright, so incrementally maintained arrays converge to exactly the
/// order a fresh rebuild produces, whatever sequence of edits led there.
pub(crate) fn sort_entries<T, S: Sorter<Item = T>>(entries: &mut [SortEntry<T>], sorter: &S) {
    entries.sort_by(|a, b| {
        sorter
            .compare(&a.item, &b.item)
            .then_with(|| a.source_position.cmp(&b.source_position))
    });
}
