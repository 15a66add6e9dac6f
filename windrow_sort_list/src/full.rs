// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The eager baseline engine: full rebuild and re-sort on every change.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use windrow_list_model::{Delta, ListModel, ObserverId, Observers};
use windrow_sorter::{Sorter, SorterChange};

use crate::entry::{SortEntry, collect_entries, sort_entries};

/// A sorted projection that rebuilds and re-sorts eagerly on every change.
///
/// This is the simplicity baseline of the three engines: correct, compact,
/// and `O(n log n)` on every upstream edit, with deliberately coarse change
/// notifications (an upstream edit is forwarded with the upstream's own
/// numbers after the projection rebuilt underneath it). Prefer
/// [`crate::TrackingSortModel`] for tighter notifications, or
/// [`crate::IncrementalSortModel`] for large collections.
///
/// Without a sorter — or with a sorter declaring
/// [`windrow_sorter::OrderClass::None`] — the engine holds no backing array
/// and passes reads and deltas through to the upstream model untouched.
pub struct FullSortModel<M: ListModel, S: Sorter<Item = M::Item>> {
    inner: Rc<FullInner<M, S>>,
}

struct FullInner<M: ListModel, S: Sorter<Item = M::Item>> {
    model: RefCell<Option<M>>,
    model_observer: Cell<Option<ObserverId>>,
    sorter: RefCell<Option<S>>,
    sorter_observer: Cell<Option<ObserverId>>,
    entries: RefCell<Option<Vec<SortEntry<M::Item>>>>,
    observers: Observers<Delta>,
}

impl<M: ListModel, S: Sorter<Item = M::Item>> FullSortModel<M, S> {
    /// Creates an engine over `model`, ordered by `sorter`.
    ///
    /// Both are optional: a missing model is an empty collection, a missing
    /// sorter means pass-through.
    #[must_use]
    pub fn new(model: Option<M>, sorter: Option<S>) -> Self {
        let this = Self {
            inner: Rc::new(FullInner {
                model: RefCell::new(None),
                model_observer: Cell::new(None),
                sorter: RefCell::new(None),
                sorter_observer: Cell::new(None),
                entries: RefCell::new(None),
                observers: Observers::new(),
            }),
        };
        this.set_sorter(sorter);
        this.set_model(model);
        this
    }

    /// The current upstream model.
    #[must_use]
    pub fn model(&self) -> Option<M> {
        self.inner.model.borrow().clone()
    }

    /// The current sorter.
    #[must_use]
    pub fn sorter(&self) -> Option<S> {
        self.inner.sorter.borrow().clone()
    }

    /// Returns `true` while no backing array is materialized and reads
    /// delegate straight to the upstream model.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.inner.entries.borrow().is_none()
    }

    /// Replaces the upstream model.
    ///
    /// Installing the handle that is already active is a silent no-op.
    /// Otherwise the old subscription is torn down, the projection is
    /// rebuilt, and one delta covering the whole old-length → new-length
    /// range is emitted (nothing when both are empty).
    pub fn set_model(&self, model: Option<M>) {
        let inner = &self.inner;
        {
            let current = inner.model.borrow();
            match (current.as_ref(), model.as_ref()) {
                (None, None) => return,
                (Some(a), Some(b)) if a.is_same(b) => return,
                _ => {}
            }
        }

        let old_len = inner.exposed_len();

        if let Some(old) = inner.model.borrow_mut().take()
            && let Some(id) = inner.model_observer.take()
        {
            old.unobserve(id);
        }
        if let Some(new) = &model {
            let weak = Rc::downgrade(inner);
            let id = new.observe(Rc::new(move |delta: &Delta| {
                if let Some(inner) = weak.upgrade() {
                    FullInner::source_changed(&inner, delta);
                }
            }));
            inner.model_observer.set(id);
        }
        *inner.model.borrow_mut() = model;

        if inner.should_sort() {
            inner.rebuild();
        } else {
            *inner.entries.borrow_mut() = None;
        }

        let new_len = inner.exposed_len();
        if old_len > 0 || new_len > 0 {
            inner.observers.emit(&Delta::new(0, old_len, new_len));
        }
    }

    /// Replaces the sorter.
    ///
    /// Installing the handle that is already active is a silent no-op. A
    /// sorter declaring no ordering drops the backing array (pass-through);
    /// otherwise the projection is (re)built and re-sorted. One full-range
    /// delta is emitted, skipped when the count is at most 1 (a single item
    /// cannot change order).
    pub fn set_sorter(&self, sorter: Option<S>) {
        let inner = &self.inner;
        {
            let current = inner.sorter.borrow();
            match (current.as_ref(), sorter.as_ref()) {
                (None, None) => return,
                (Some(a), Some(b)) if a.is_same(b) => return,
                _ => {}
            }
        }

        if let Some(old) = inner.sorter.borrow_mut().take()
            && let Some(id) = inner.sorter_observer.take()
        {
            old.unobserve(id);
        }
        if let Some(new) = &sorter {
            let weak = Rc::downgrade(inner);
            let id = new.observe(Rc::new(move |change: &SorterChange| {
                if let Some(inner) = weak.upgrade() {
                    FullInner::sorter_changed(&inner, *change);
                }
            }));
            inner.sorter_observer.set(id);
        }
        *inner.sorter.borrow_mut() = sorter;

        let was_active = inner.entries.borrow().is_some();
        let activate = inner.should_sort();
        if activate {
            if was_active {
                inner.resort();
            } else {
                inner.rebuild();
            }
        } else {
            *inner.entries.borrow_mut() = None;
        }

        let n = inner.exposed_len();
        if (was_active || activate) && n > 1 {
            inner.observers.emit(&Delta::replacement(0, n));
        }
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> FullInner<M, S> {
    fn should_sort(&self) -> bool {
        self.model.borrow().is_some()
            && self
                .sorter
                .borrow()
                .as_ref()
                .is_some_and(|sorter| sorter.order().orders())
    }

    fn exposed_len(&self) -> usize {
        if let Some(entries) = self.entries.borrow().as_ref() {
            entries.len()
        } else {
            self.model.borrow().as_ref().map_or(0, ListModel::len)
        }
    }

    fn get_item(&self, position: usize) -> Option<M::Item> {
        let entries = self.entries.borrow();
        match entries.as_ref() {
            Some(entries) => entries.get(position).map(|entry| entry.item.clone()),
            None => self
                .model
                .borrow()
                .as_ref()
                .and_then(|model| model.get(position)),
        }
    }

    /// Re-reads the whole model and sorts it.
    fn rebuild(&self) {
        let model = self.model.borrow().clone();
        let sorter = self.sorter.borrow().clone();
        let (Some(model), Some(sorter)) = (model, sorter) else {
            *self.entries.borrow_mut() = None;
            return;
        };
        let mut entries = collect_entries(&model);
        sort_entries(&mut entries, &sorter);
        *self.entries.borrow_mut() = Some(entries);
    }

    /// Re-sorts the existing backing array in place.
    fn resort(&self) {
        let sorter = self.sorter.borrow().clone();
        let mut entries = self.entries.borrow_mut();
        if let (Some(sorter), Some(entries)) = (sorter.as_ref(), entries.as_mut()) {
            sort_entries(entries, sorter);
        }
    }

    fn source_changed(inner: &Rc<Self>, delta: &Delta) {
        if delta.is_empty() {
            return;
        }
        if inner.entries.borrow().is_some() {
            inner.rebuild();
            debug_assert_eq!(
                inner.entries.borrow().as_ref().map(Vec::len),
                inner.model.borrow().as_ref().map(ListModel::len),
                "backing array must track the upstream count"
            );
        }
        // The baseline propagates the upstream's own numbers: coarse, but
        // always count-consistent with what downstream observed so far.
        inner.observers.emit(delta);
    }

    fn sorter_changed(inner: &Rc<Self>, change: SorterChange) {
        if change == SorterChange::Unchanged {
            return;
        }
        let n = inner.exposed_len();
        if inner.should_sort() {
            if inner.entries.borrow().is_some() {
                inner.resort();
            } else {
                inner.rebuild();
            }
            if n > 1 {
                inner.observers.emit(&Delta::replacement(0, n));
            }
        } else {
            let had_entries = inner.entries.borrow_mut().take().is_some();
            if had_entries && n > 1 {
                inner.observers.emit(&Delta::replacement(0, n));
            }
        }
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> Drop for FullInner<M, S> {
    fn drop(&mut self) {
        if let (Some(model), Some(id)) = (self.model.get_mut().take(), self.model_observer.take())
        {
            model.unobserve(id);
        }
        if let (Some(sorter), Some(id)) =
            (self.sorter.get_mut().take(), self.sorter_observer.take())
        {
            sorter.unobserve(id);
        }
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> Clone for FullSortModel<M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> fmt::Debug for FullSortModel<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullSortModel")
            .field("len", &self.len())
            .field("pass_through", &self.is_pass_through())
            .finish_non_exhaustive()
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> ListModel for FullSortModel<M, S> {
    type Item = M::Item;

    fn len(&self) -> usize {
        self.inner.exposed_len()
    }

    fn get(&self, position: usize) -> Option<M::Item> {
        self.inner.get_item(position)
    }

    fn observe(&self, observer: Rc<dyn Fn(&Delta)>) -> Option<ObserverId> {
        Some(self.inner.observers.observe(observer))
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        self.inner.observers.remove(id)
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
