// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lazy engine: bounded-work merge sorting off the idle queue.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::cmp::Ordering;
use core::fmt;
use core::mem;

use windrow_list_model::{Delta, ListModel, ObserverId, Observers};
use windrow_sorter::{Sorter, SorterChange};

use crate::entry::{SortEntry, collect_entries, sort_entries};
use crate::idle::{Idle, IdleQueue, TaskId};
use crate::range::{edit_window, permuted_window};

/// Default number of comparison steps one idle turn may spend.
const DEFAULT_STEP_BUDGET: usize = 10_000;

/// Progress of an in-place bottom-up merge sort.
///
/// The backing array is treated as sorted runs of `run_size` entries;
/// `cursor` is the start of the next pair of runs to merge. When a pass over
/// the array completes, `cursor` resets and `run_size` doubles; the sort is
/// finished once a single run covers the array.
#[derive(Debug, Clone, Copy)]
struct MergeState {
    run_size: usize,
    cursor: usize,
}

/// A sorted projection that spreads sorting work over idle-queue turns.
///
/// On any change that requires (re)sorting, the engine captures the items,
/// exposes them immediately in their current order, and schedules a task on
/// its [`IdleQueue`]. Each turn performs a bounded amount of merge work —
/// see [`IncrementalSortModel::set_step_budget`] — and emits at most one
/// delta covering the sub-range that turn rearranged, so the host's event
/// loop stays responsive no matter how large the collection is. Mid-sort,
/// reads are answered from the partially-sorted array; every intermediate
/// state is internally consistent, just not yet fully ordered.
///
/// Once settled, upstream edits take the same minimal-notification path as
/// [`crate::TrackingSortModel`]: stale slots are dropped by their recorded
/// source position and added items are binary-inserted, without restarting
/// a sort. An upstream edit that arrives mid-sort instead cancels the run
/// and starts over from the current upstream contents.
///
/// [`IncrementalSortModel::set_incremental`] switches the engine to
/// synchronous sorting for hosts that prefer blocking over intermediate
/// states.
pub struct IncrementalSortModel<M: ListModel, S: Sorter<Item = M::Item>> {
    inner: Rc<IncrementalInner<M, S>>,
}

struct IncrementalInner<M: ListModel, S: Sorter<Item = M::Item>> {
    queue: IdleQueue,
    model: RefCell<Option<M>>,
    model_observer: Cell<Option<ObserverId>>,
    sorter: RefCell<Option<S>>,
    sorter_observer: Cell<Option<ObserverId>>,
    entries: RefCell<Option<Vec<SortEntry<M::Item>>>>,
    merge: Cell<Option<MergeState>>,
    task: Cell<Option<TaskId>>,
    step_budget: Cell<usize>,
    incremental: Cell<bool>,
    observers: Observers<Delta>,
}

impl<M: ListModel, S: Sorter<Item = M::Item>> IncrementalSortModel<M, S> {
    /// Creates an empty engine scheduling its work on `queue`.
    #[must_use]
    pub fn new(queue: &IdleQueue) -> Self {
        Self {
            inner: Rc::new(IncrementalInner {
                queue: queue.clone(),
                model: RefCell::new(None),
                model_observer: Cell::new(None),
                sorter: RefCell::new(None),
                sorter_observer: Cell::new(None),
                entries: RefCell::new(None),
                merge: Cell::new(None),
                task: Cell::new(None),
                step_budget: Cell::new(DEFAULT_STEP_BUDGET),
                incremental: Cell::new(true),
                observers: Observers::new(),
            }),
        }
    }

    /// Creates an engine over `model`, ordered by `sorter`, on `queue`.
    #[must_use]
    pub fn with(queue: &IdleQueue, model: Option<M>, sorter: Option<S>) -> Self {
        let this = Self::new(queue);
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

    /// Returns `true` while a sort is still in progress.
    #[must_use]
    pub fn is_sorting(&self) -> bool {
        self.inner.merge.get().is_some()
    }

    /// Rough number of comparison steps left before the projection settles.
    ///
    /// Returns 0 once sorted. The estimate is monotone enough to drive a
    /// progress indicator; it is not an exact operation count.
    #[must_use]
    pub fn pending(&self) -> usize {
        let Some(state) = self.inner.merge.get() else {
            return 0;
        };
        let len = self.inner.entries.borrow().as_ref().map_or(0, Vec::len);
        if state.run_size >= len {
            return 0;
        }
        let mut run = state.run_size;
        let mut passes = 0_usize;
        while run < len {
            run *= 2;
            passes += 1;
        }
        (passes * len).saturating_sub(state.cursor).max(1)
    }

    /// The number of comparison steps one idle turn may spend.
    #[must_use]
    pub fn step_budget(&self) -> usize {
        self.inner.step_budget.get()
    }

    /// Sets the per-turn work budget (clamped to at least 1).
    ///
    /// Smaller budgets mean shorter turns and more of them; the default is
    /// 10,000 steps. Takes effect from the next turn.
    pub fn set_step_budget(&self, budget: usize) {
        self.inner.step_budget.set(budget.max(1));
    }

    /// Whether sorting is spread over idle turns (the default).
    #[must_use]
    pub fn incremental(&self) -> bool {
        self.inner.incremental.get()
    }

    /// Switches between incremental and synchronous sorting.
    ///
    /// Turning incremental mode off while a sort is in flight finishes that
    /// sort immediately, emitting its remaining per-turn deltas.
    pub fn set_incremental(&self, incremental: bool) {
        let inner = &self.inner;
        if inner.incremental.get() == incremental {
            return;
        }
        inner.incremental.set(incremental);
        if !incremental && inner.merge.get().is_some() {
            if let Some(id) = inner.task.take() {
                inner.queue.cancel(id);
            }
            inner.finish_now();
        }
    }

    /// Replaces the upstream model.
    ///
    /// Installing the handle that is already active is a silent no-op.
    /// Otherwise any in-flight sort is cancelled, the new contents are
    /// exposed immediately in upstream order under one delta covering the
    /// whole old-length → new-length range, and a fresh sort is scheduled.
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

        inner.cancel();
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
                    IncrementalInner::source_changed(&inner, delta);
                }
            }));
            inner.model_observer.set(id);
        }
        *inner.model.borrow_mut() = model;

        if inner.should_sort() {
            inner.capture();
        } else {
            *inner.entries.borrow_mut() = None;
        }

        let new_len = inner.exposed_len();
        // In synchronous mode this sorts before observers hear anything; in
        // incremental mode it only queues the task, so the delta below still
        // describes the unsorted capture.
        IncrementalInner::begin_sort(inner);
        if old_len > 0 || new_len > 0 {
            inner.observers.emit(&Delta::new(0, old_len, new_len));
        }
    }

    /// Replaces the sorter.
    ///
    /// Installing the handle that is already active is a silent no-op.
    /// Switching sorters over an already-materialized projection keeps the
    /// item set and re-sorts it; incrementally this means the reshuffle
    /// arrives as per-turn deltas rather than one synchronous window.
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

        inner.cancel();

        if let Some(old) = inner.sorter.borrow_mut().take()
            && let Some(id) = inner.sorter_observer.take()
        {
            old.unobserve(id);
        }
        if let Some(new) = &sorter {
            let weak = Rc::downgrade(inner);
            let id = new.observe(Rc::new(move |change: &SorterChange| {
                if let Some(inner) = weak.upgrade() {
                    IncrementalInner::sorter_changed(&inner, *change);
                }
            }));
            inner.sorter_observer.set(id);
        }
        *inner.sorter.borrow_mut() = sorter;

        IncrementalInner::apply_sorter(inner);
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> IncrementalInner<M, S> {
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

    /// Reads the whole model into the backing array, in upstream order.
    fn capture(&self) {
        let model = self.model.borrow().clone();
        let Some(model) = model else {
            *self.entries.borrow_mut() = None;
            return;
        };
        *self.entries.borrow_mut() = Some(collect_entries(&model));
    }

    /// Cancels any in-flight sort. The backing array stays as-is.
    fn cancel(&self) {
        if let Some(id) = self.task.take() {
            self.queue.cancel(id);
        }
        self.merge.set(None);
    }

    /// Starts sorting the current backing array from scratch.
    ///
    /// Incremental mode schedules idle turns; otherwise the array is sorted
    /// here and now, silently (callers emit their own structural delta).
    fn begin_sort(inner: &Rc<Self>) {
        let len = inner.entries.borrow().as_ref().map_or(0, Vec::len);
        if len <= 1 {
            inner.merge.set(None);
            return;
        }
        if inner.incremental.get() {
            inner.merge.set(Some(MergeState {
                run_size: 1,
                cursor: 0,
            }));
            Self::schedule(inner);
        } else {
            let sorter = inner.sorter.borrow().clone();
            if let Some(sorter) = sorter
                && let Some(entries) = inner.entries.borrow_mut().as_mut()
            {
                sort_entries(entries, &sorter);
            }
        }
    }

    fn schedule(inner: &Rc<Self>) {
        if inner.task.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(inner);
        let id = inner.queue.add(Rc::new(move || match weak.upgrade() {
            Some(inner) => Self::idle_step(&inner),
            None => Idle::Done,
        }));
        inner.task.set(Some(id));
    }

    fn idle_step(inner: &Rc<Self>) -> Idle {
        let Some(my_id) = inner.task.get() else {
            return Idle::Done;
        };
        let (delta, more) = inner.merge_turn();
        if !more {
            inner.task.set(None);
        }
        if let Some(delta) = delta {
            debug_assert_eq!(
                delta.removed, delta.added,
                "a merge turn permutes, never resizes"
            );
            inner.observers.emit(&delta);
        }
        // An observer may have cancelled or restarted the sort while
        // handling the delta; if so this task must not be re-queued.
        if more && inner.task.get() == Some(my_id) {
            Idle::Again
        } else {
            Idle::Done
        }
    }

    /// Runs the rest of an in-flight sort synchronously, emitting the same
    /// per-turn deltas the idle path would have.
    fn finish_now(&self) {
        loop {
            let (delta, more) = self.merge_turn();
            if let Some(delta) = delta {
                self.observers.emit(&delta);
            }
            if !more {
                break;
            }
        }
    }

    /// Spends up to one budget's worth of merge steps.
    ///
    /// Returns the minimal window the turn rearranged (if any entry moved)
    /// and whether more work remains.
    fn merge_turn(&self) -> (Option<Delta>, bool) {
        let Some(mut state) = self.merge.get() else {
            return (None, false);
        };
        let sorter = self.sorter.borrow().clone();
        let Some(sorter) = sorter else {
            self.merge.set(None);
            return (None, false);
        };
        let budget = self.step_budget.get().max(1);
        let mut spent = 0_usize;
        let mut touched: Option<(usize, usize)> = None;
        let mut done = false;

        {
            let mut slot = self.entries.borrow_mut();
            let Some(entries) = slot.as_mut() else {
                self.merge.set(None);
                return (None, false);
            };
            let len = entries.len();
            if state.run_size >= len {
                done = true;
            }
            while !done && spent < budget {
                if state.cursor + state.run_size >= len {
                    // Pass complete: double the runs and start over.
                    state.cursor = 0;
                    state.run_size *= 2;
                    if state.run_size >= len {
                        done = true;
                    }
                    continue;
                }
                let start = state.cursor;
                let mid = start + state.run_size;
                let end = (start + 2 * state.run_size).min(len);

                // Stable two-pointer merge of [start, mid) and [mid, end),
                // rotating each out-of-order entry into place instead of
                // spilling to a scratch buffer.
                let mut left = start;
                let mut right = mid;
                while left < right && right < end {
                    spent += 1;
                    if sorter.compare(&entries[right].item, &entries[left].item) == Ordering::Less
                    {
                        entries[left..=right].rotate_right(1);
                        touched = Some(match touched {
                            None => (left, right + 1),
                            Some((lo, hi)) => (lo.min(left), hi.max(right + 1)),
                        });
                        right += 1;
                    }
                    left += 1;
                }
                state.cursor += 2 * state.run_size;
            }
        }

        self.merge.set(if done { None } else { Some(state) });
        let delta = touched.map(|(lo, hi)| Delta::replacement(lo, hi - lo));
        (delta, !done)
    }

    /// Reconciles the backing array with the current sorter, then kicks off
    /// whatever sorting that requires.
    fn apply_sorter(inner: &Rc<Self>) {
        if inner.should_sort() {
            if inner.entries.borrow().is_none() {
                // Activating from pass-through: the exposed contents are
                // unchanged at this instant, so capturing is silent and the
                // reshuffle arrives as sort progress.
                inner.capture();
            }
            if inner.incremental.get() {
                Self::begin_sort(inner);
            } else if let Some(window) = inner.resort_minimal() {
                inner.observers.emit(&window);
            }
        } else {
            let taken = inner.entries.borrow_mut().take();
            if let Some(entries) = taken
                && entries.len() > 1
            {
                inner.observers.emit(&Delta::replacement(0, entries.len()));
            }
        }
    }

    /// Synchronous re-sort with a minimal notification window.
    fn resort_minimal(&self) -> Option<Delta> {
        let sorter = self.sorter.borrow().clone()?;
        let mut slot = self.entries.borrow_mut();
        let entries = slot.as_mut()?;
        let old_keys: Vec<usize> = entries.iter().map(|e| e.source_position).collect();
        sort_entries(entries, &sorter);
        let new_keys: Vec<usize> = entries.iter().map(|e| e.source_position).collect();
        permuted_window(&old_keys, &new_keys)
    }

    fn sorter_changed(inner: &Rc<Self>, change: SorterChange) {
        if change == SorterChange::Unchanged {
            return;
        }
        inner.cancel();
        Self::apply_sorter(inner);
    }

    fn source_changed(inner: &Rc<Self>, delta: &Delta) {
        if delta.is_empty() {
            return;
        }
        if inner.entries.borrow().is_none() {
            inner.observers.emit(delta);
            return;
        }

        if inner.merge.get().is_some() || inner.task.get().is_some() {
            // Mid-sort the source positions are no longer trustworthy as a
            // description of what downstream has seen move; start over.
            inner.cancel();
            let old_len = inner.exposed_len();
            inner.capture();
            let new_len = inner.exposed_len();
            Self::begin_sort(inner);
            inner.observers.emit(&Delta::new(0, old_len, new_len));
            return;
        }

        Self::settled_edit(inner, delta);
    }

    /// Applies an upstream edit to a fully-sorted backing array: stale slots
    /// drop out by source position, added items binary-insert, and the
    /// notification covers only the window that changed. No sort restarts.
    fn settled_edit(inner: &Rc<Self>, delta: &Delta) {
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

            // The survivors are still sorted with ties in upstream order,
            // so each added item binary-inserts at the position a fresh
            // rebuild would give it: after smaller items, and among equals
            // by upstream position.
            for position in delta.position..delta.added_end() {
                if let Some(item) = model.get(position) {
                    let at = kept.partition_point(|entry| {
                        match sorter.compare(&entry.item, &item) {
                            Ordering::Less => true,
                            Ordering::Equal => entry.source_position < position,
                            Ordering::Greater => false,
                        }
                    });
                    kept.insert(
                        at,
                        SortEntry {
                            item,
                            source_position: position,
                        },
                    );
                }
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
}

impl<M: ListModel, S: Sorter<Item = M::Item>> Drop for IncrementalInner<M, S> {
    fn drop(&mut self) {
        if let Some(id) = self.task.take() {
            self.queue.cancel(id);
        }
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

impl<M: ListModel, S: Sorter<Item = M::Item>> Clone for IncrementalSortModel<M, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> fmt::Debug for IncrementalSortModel<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalSortModel")
            .field("len", &self.len())
            .field("sorting", &self.is_sorting())
            .field("step_budget", &self.step_budget())
            .finish_non_exhaustive()
    }
}

impl<M: ListModel, S: Sorter<Item = M::Item>> ListModel for IncrementalSortModel<M, S> {
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

#[cfg(test)]
mod tests {
    use super::IncrementalSortModel;
    use crate::idle::IdleQueue;
    use crate::testing::{contents, mirror, record};
    use alloc::vec::Vec;
    use windrow_list_model::{Delta, ListModel, VecModel};
    use windrow_sorter::{CustomSorter, NaturalSorter};

    #[test]
    fn sorts_once_the_queue_is_pumped() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([3_u32, 1, 2]);
        let sorted =
            IncrementalSortModel::with(&queue, Some(model), Some(NaturalSorter::new()));

        // Contents are exposed immediately, in upstream order, while the
        // sort is still pending.
        assert_eq!(contents(&sorted), [3, 1, 2]);
        assert!(sorted.is_sorting());
        assert!(sorted.pending() > 0);

        queue.drain();
        assert_eq!(contents(&sorted), [1, 2, 3]);
        assert!(!sorted.is_sorting());
        assert_eq!(sorted.pending(), 0);
    }

    #[test]
    fn length_is_stable_across_the_whole_sort() {
        let queue = IdleQueue::new();
        let items: Vec<u32> = (0..64).map(|i| (i * 37) % 64).collect();
        let model = VecModel::from_items(items);
        let sorted =
            IncrementalSortModel::with(&queue, Some(model), Some(NaturalSorter::new()));
        sorted.set_step_budget(4);
        let replica = mirror(&sorted);

        let mut turns = 0;
        while queue.dispatch() {
            turns += 1;
            assert_eq!(sorted.len(), 64);
            assert_eq!(*replica.borrow(), contents(&sorted));
        }
        assert!(turns > 1, "a 4-step budget must take several turns");
        let expected: Vec<u32> = {
            let mut v: Vec<u32> = (0..64).map(|i| (i * 37) % 64).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(contents(&sorted), expected);
    }

    #[test]
    fn each_turn_emits_at_most_one_permutation_delta() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([9_u32, 7, 5, 3, 1, 8, 6, 4, 2, 0]);
        let sorted =
            IncrementalSortModel::with(&queue, Some(model), Some(NaturalSorter::new()));
        sorted.set_step_budget(3);
        let deltas = record(&sorted);

        while queue.dispatch() {
            let seen = deltas.borrow().len();
            for delta in deltas.borrow().iter() {
                assert_eq!(delta.removed, delta.added);
            }
            deltas.borrow_mut().clear();
            assert!(seen <= 1, "one turn, at most one delta");
        }
        assert_eq!(contents(&sorted), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn settled_insert_takes_the_minimal_path() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([10_u32, 20, 30, 40]);
        let sorted = IncrementalSortModel::with(
            &queue,
            Some(model.clone()),
            Some(NaturalSorter::new()),
        );
        queue.drain();
        let deltas = record(&sorted);

        model.push(50);
        assert_eq!(*deltas.borrow(), [Delta::insertion(4, 1)]);
        assert!(!sorted.is_sorting(), "a settled edit must not restart the sort");
        assert!(queue.is_empty());
        assert_eq!(contents(&sorted), [10, 20, 30, 40, 50]);

        model.insert(0, 25);
        assert_eq!(
            *deltas.borrow(),
            [Delta::insertion(4, 1), Delta::insertion(2, 1)]
        );
        assert_eq!(contents(&sorted), [10, 20, 25, 30, 40, 50]);
    }

    #[test]
    fn settled_removal_maps_through_source_positions() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([5_u32, 4, 3, 2, 1]);
        let sorted = IncrementalSortModel::with(
            &queue,
            Some(model.clone()),
            Some(NaturalSorter::new()),
        );
        queue.drain();
        let deltas = record(&sorted);

        model.remove(0); // the value 5, sorted position 4
        assert_eq!(*deltas.borrow(), [Delta::removal(4, 1)]);
        assert_eq!(contents(&sorted), [1, 2, 3, 4]);
    }

    #[test]
    fn equal_keys_inserted_upstream_first_sort_first() {
        // The settled binary-insert path must agree with what rebuilding
        // from upstream order would produce: among equal-comparing items,
        // upstream order wins.
        let queue = IdleQueue::new();
        let model = VecModel::from_items([(5_u32, 'a'), (3, 'b')]);
        let sorter = CustomSorter::new(|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0));
        let sorted = IncrementalSortModel::with(&queue, Some(model.clone()), Some(sorter));
        queue.drain();
        assert_eq!(contents(&sorted), [(3, 'b'), (5, 'a')]);

        model.insert(0, (5, 'c'));
        assert!(!sorted.is_sorting());
        assert_eq!(contents(&sorted), [(3, 'b'), (5, 'c'), (5, 'a')]);
    }

    #[test]
    fn edit_mid_sort_restarts_from_current_contents() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([9_u32, 8, 7, 6, 5, 4, 3, 2, 1]);
        let sorted = IncrementalSortModel::with(
            &queue,
            Some(model.clone()),
            Some(NaturalSorter::new()),
        );
        sorted.set_step_budget(2);
        assert!(queue.dispatch());
        assert!(sorted.is_sorting());

        model.push(0);
        assert!(sorted.is_sorting());
        queue.drain();
        assert_eq!(contents(&sorted), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(queue.is_empty());
    }

    #[test]
    fn unordered_sorter_passes_items_through_by_identity() {
        use alloc::rc::Rc;

        let queue = IdleQueue::new();
        let items = [Rc::new(3_u32), Rc::new(1), Rc::new(2)];
        let model = VecModel::from_items(items.clone());
        let sorter = CustomSorter::<Rc<u32>>::unordered();
        let sorted = IncrementalSortModel::with(&queue, Some(model), Some(sorter));

        assert!(sorted.is_pass_through());
        assert!(!sorted.is_sorting());
        assert!(queue.is_empty());
        for (position, item) in items.iter().enumerate() {
            let got = sorted.get(position).unwrap();
            assert!(Rc::ptr_eq(&got, item));
        }
    }

    #[test]
    fn dropping_the_order_releases_the_backing_array() {
        use alloc::rc::Rc;

        let queue = IdleQueue::new();
        let items = [Rc::new(2_u32), Rc::new(3), Rc::new(1)];
        let model = VecModel::from_items(items.clone());
        let sorted = IncrementalSortModel::with(
            &queue,
            Some(model),
            Some(CustomSorter::new(|a: &Rc<u32>, b: &Rc<u32>| a.cmp(b))),
        );
        queue.drain();
        assert_eq!(contents(&sorted), [Rc::new(1), Rc::new(2), Rc::new(3)]);
        let deltas = record(&sorted);

        sorted.set_sorter(Some(CustomSorter::unordered()));
        assert!(sorted.is_pass_through());
        assert_eq!(*deltas.borrow(), [Delta::replacement(0, 3)]);
        // Reads delegate to the upstream items by identity, in upstream order.
        for (position, item) in items.iter().enumerate() {
            let got = sorted.get(position).unwrap();
            assert!(Rc::ptr_eq(&got, item));
        }
    }

    #[test]
    fn reinstalling_the_same_handles_is_silent() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([2_u32, 1]);
        let sorter = NaturalSorter::<u32>::new();
        let sorted =
            IncrementalSortModel::with(&queue, Some(model.clone()), Some(sorter));
        queue.drain();
        let deltas = record(&sorted);

        sorted.set_model(Some(model));
        sorted.set_sorter(Some(sorter));
        assert!(deltas.borrow().is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn non_incremental_mode_sorts_without_the_queue() {
        let queue = IdleQueue::new();
        let sorted: IncrementalSortModel<VecModel<u32>, NaturalSorter<u32>> =
            IncrementalSortModel::new(&queue);
        sorted.set_incremental(false);
        sorted.set_sorter(Some(NaturalSorter::new()));
        sorted.set_model(Some(VecModel::from_items([3_u32, 1, 2])));

        assert!(queue.is_empty());
        assert!(!sorted.is_sorting());
        assert_eq!(contents(&sorted), [1, 2, 3]);
    }

    #[test]
    fn turning_incremental_off_finishes_an_inflight_sort() {
        let queue = IdleQueue::new();
        let model = VecModel::from_items([5_u32, 4, 3, 2, 1]);
        let sorted =
            IncrementalSortModel::with(&queue, Some(model), Some(NaturalSorter::new()));
        sorted.set_step_budget(1);
        assert!(queue.dispatch());
        assert!(sorted.is_sorting());

        sorted.set_incremental(false);
        assert!(!sorted.is_sorting());
        assert_eq!(contents(&sorted), [1, 2, 3, 4, 5]);
        // The abandoned task must never run again.
        queue.drain();
        assert_eq!(contents(&sorted), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn replacing_the_model_cancels_and_restarts() {
        let queue = IdleQueue::new();
        let first = VecModel::from_items([3_u32, 2, 1]);
        let sorted = IncrementalSortModel::with(
            &queue,
            Some(first),
            Some(NaturalSorter::new()),
        );
        sorted.set_step_budget(1);
        assert!(queue.dispatch());

        let second = VecModel::from_items([9_u32, 6, 8, 7]);
        let deltas = record(&sorted);
        sorted.set_model(Some(second));
        assert_eq!(deltas.borrow().first(), Some(&Delta::new(0, 3, 4)));

        queue.drain();
        assert_eq!(contents(&sorted), [6, 7, 8, 9]);
    }

    #[test]
    fn pending_shrinks_to_zero() {
        let queue = IdleQueue::new();
        let items: Vec<u32> = (0..32).rev().collect();
        let model = VecModel::from_items(items);
        let sorted =
            IncrementalSortModel::with(&queue, Some(model), Some(NaturalSorter::new()));
        sorted.set_step_budget(8);

        let mut last = sorted.pending();
        assert!(last > 0);
        while queue.dispatch() {
            let now = sorted.pending();
            assert!(now <= last, "the progress estimate must not grow");
            last = now;
        }
        assert_eq!(sorted.pending(), 0);
    }
}
