// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The position-tracking engine: eager sorting, minimal notifications.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::mem;

use windrow_list_model::{Delta, ListModel, ObserverId, Observers};
use windrow_sorter::{Sorter, SorterChange};

use crate::entry::{SortEntry, collect_entries, sort_entries};
use crate::range::{edit_window, permuted_window};

/// A sorted projection that still sorts eagerly, but tracks each entry's
/// upstream position so it can translate upstream edits into the smallest
/// changed window of the projection.
///
/// Compared to [`crate::FullSortModel`], an upstream edit costs one walk over
/// the backing array plus a re-sort, reads only the items the edit actually
/// added, and notifies downstream observers about exactly the sub-range of
/// positions that could have moved — an insert whose sorted position is
/// adjacent to its neighbors invalidates one slot, not the whole projection.
///
/// Without a sorter — or with a sorter declaring
/// [`windrow_sorter::OrderClass::None`] — the engine holds no backing array
/// and passes reads and deltas through to the upstream model untouched.
pub struct TrackingSortModel<M: ListModel, S: Sorter<Item = M::Item>> {
    inner: Rc<TrackingInner<M, S>>,
}

struct TrackingInner<M: ListModel, S: Sorter<Item = M::Item>> {
    model: RefCell<Option<M>>,
    model_observer: Cell<Option<ObserverId>>,
    sorter: RefCell<Option<S>>,
    sorter_observer: Cell<Option<ObserverId>>,
    entries: RefCell<Option<Vec<SortEntry<M::Item>>>>,
    observers: Observers<Delta>,
}

impl<M: ListModel, S: Sorter<Item = M::Item>> TrackingSortModel<M, S> {
    /// Creates an engine over `model`, ordered by `sorter`.
    ///
    /// Both are optional: a missing model is an empty collection, a missing
    /// sorter means pass-through.
    #[must_use]
    pub fn new(model: Option<M>, sorter: Option<S>) -> Self {
        let this = Self {
            inner: Rc::new(TrackingInner {
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
                    TrackingInner::source_changed(&inner, delta);
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
    /// Installing the handle that is already active is a silent no-op.
    /// Activation, deactivation, and re-sorting all notify with the minimal
    /// window of positions whose entry actually moved; in particular, a swap
    /// to an equivalently-ordering sorter emits nothing.
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
                    TrackingInner::sorter_changed(&inner, *change);
                }
            }));
            inner.sorter_observer.set(id);
        }
        *inner.sorter.borrow_mut() = sorter;

        inner.apply_order();
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> TrackingInner<M, S> {
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

    /// Re-reads the whole model and sorts it, without emitting.
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

    /// Re-sorts the backing array in place and returns the minimal window
    /// of positions whose entry moved.
    fn resort_minimal(&self) -> Option<Delta> {
        let sorter = self.sorter.borrow().clone()?;
        let mut slot = self.entries.borrow_mut();
        let entries = slot.as_mut()?;
        let old_keys: Vec<usize> = entries.iter().map(|e| e.source_position).collect();
        sort_entries(entries, &sorter);
        let new_keys: Vec<usize> = entries.iter().map(|e| e.source_position).collect();
        permuted_window(&old_keys, &new_keys)
    }

    /// Materializes the backing array from pass-through mode and returns the
    /// minimal window that differs from the upstream (identity) order.
    fn activate_minimal(&self) -> Option<Delta> {
        let model = self.model.borrow().clone()?;
        let sorter = self.sorter.borrow().clone()?;
        let mut entries = collect_entries(&model);
        sort_entries(&mut entries, &sorter);
        let old_keys: Vec<usize> = (0..entries.len()).collect();
        let new_keys: Vec<usize> = entries.iter().map(|e| e.source_position).collect();
        let window = permuted_window(&old_keys, &new_keys);
        *self.entries.borrow_mut() = Some(entries);
        window
    }

    /// Drops the backing array and returns the minimal window that differs
    /// from the restored upstream (identity) order.
    fn deactivate_minimal(&self) -> Option<Delta> {
        let entries = self.entries.borrow_mut().take()?;
        let old_keys: Vec<usize> = entries.iter().map(|e| e.source_position).collect();
        let new_keys: Vec<usize> = (0..entries.len()).collect();
        permuted_window(&old_keys, &new_keys)
    }

    /// Reconciles the backing array with the current sorter's order class
    /// and emits the resulting minimal window, if any.
    fn apply_order(&self) {
        let window = if self.should_sort() {
            if self.entries.borrow().is_some() {
                self.resort_minimal()
            } else {
                self.activate_minimal()
            }
        } else {
            self.deactivate_minimal()
        };
        if let Some(window) = window {
            self.observers.emit(&window);
        }
    }

    fn source_changed(inner: &Rc<Self>, delta: &Delta) {
        if delta.is_empty() {
            return;
        }
        if inner.entries.borrow().is_none() {
            inner.observers.emit(delta);
            return;
        }

        let model = inner.model.borrow().clone();
        let sorter = inner.sorter.borrow().clone();
        let (Some(model), Some(sorter)) = (model, sorter) else {
            return;
        };

        let mut dropped = Vec::new();
        let (old_len, new_len, inserted) = {
            let mut slot = inner.entries.borrow_mut();
            let Some(entries) = slot.as_mut() else {
                return;
            };
            let old_len = entries.len();

            // One walk: drop the slots the edit removed, renumber the rest
            // to the new upstream numbering.
            let old_entries = mem::take(entries);
            let mut kept = Vec::with_capacity(old_len + delta.added);
            for (index, mut entry) in old_entries.into_iter().enumerate() {
                if entry.source_position >= delta.position
                    && entry.source_position < delta.removed_end()
                {
                    dropped.push(index);
                } else {
                    if entry.source_position >= delta.removed_end() {
                        entry.source_position =
                            entry.source_position - delta.removed + delta.added;
                    }
                    kept.push(entry);
                }
            }

            // Read only the items the edit added.
            for position in delta.position..delta.added_end() {
                if let Some(item) = model.get(position) {
                    kept.push(SortEntry {
                        item,
                        source_position: position,
                    });
                }
            }
            if delta.added > 0 {
                sort_entries(&mut kept, &sorter);
            }

            let inserted: Vec<usize> = kept
                .iter()
                .enumerate()
                .filter(|(_, entry)| {
                    entry.source_position >= delta.position
                        && entry.source_position < delta.added_end()
                })
                .map(|(index, _)| index)
                .collect();

            let new_len = kept.len();
            *entries = kept;
            (old_len, new_len, inserted)
        };

        debug_assert_eq!(
            new_len,
            model.len(),
            "backing array must track the upstream count"
        );
        if let Some(window) = edit_window(old_len, new_len, &dropped, &inserted) {
            inner.observers.emit(&window);
        }
    }

    fn sorter_changed(inner: &Rc<Self>, change: SorterChange) {
        // An order-preserving swap must not cause a visible reshuffle.
        if change == SorterChange::Unchanged {
            return;
        }
        inner.apply_order();
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> Drop for TrackingInner<M, S> {
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

impl<M: ListModel, S: Sorter<Item = M::Item>> Clone for TrackingSortModel<M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> fmt::Debug for TrackingSortModel<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingSortModel")
            .field("len", &self.len())
            .field("pass_through", &self.is_pass_through())
            .finish_non_exhaustive()
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> ListModel for TrackingSortModel<M, S> {
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
