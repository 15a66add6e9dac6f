// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small observer registry for single-threaded change notification.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

/// Identifies one registered observer within an [`Observers`] registry.
///
/// Ids are never reused within a registry, so a stale id held after
/// [`Observers::remove`] is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// An ordered registry of observers notified with events of type `E`.
///
/// Observers are invoked in registration order. Emission snapshots the
/// current observer list first, so an observer may register or remove
/// observers (including itself) while being notified; such changes take
/// effect from the next emission.
///
/// This type is single-threaded by construction and uses interior
/// mutability so that models can expose `&self` subscription methods.
pub struct Observers<E> {
    entries: RefCell<Vec<(ObserverId, Rc<dyn Fn(&E)>)>>,
    next_id: Cell<u64>,
}

impl<E> Observers<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Registers `observer` and returns its id.
    pub fn observe(&self, observer: Rc<dyn Fn(&E)>) -> ObserverId {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, observer));
        id
    }

    /// Removes the observer registered under `id`.
    ///
    /// Returns `false` if `id` is not (or no longer) registered.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if no observers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Notifies every registered observer with `event`, in registration order.
    pub fn emit(&self, event: &E) {
        // Snapshot so observers can mutate the registry re-entrantly.
        let snapshot: SmallVec<[Rc<dyn Fn(&E)>; 4]> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in snapshot {
            observer(event);
        }
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Observers;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn emits_in_registration_order() {
        let observers = Observers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in 0..3 {
            let seen = seen.clone();
            observers.observe(Rc::new(move |event: &u32| {
                seen.borrow_mut().push((tag, *event));
            }));
        }

        observers.emit(&7);
        assert_eq!(*seen.borrow(), [(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn remove_disconnects() {
        let observers = Observers::new();
        let count = Rc::new(RefCell::new(0));

        let count2 = count.clone();
        let id = observers.observe(Rc::new(move |_: &()| {
            *count2.borrow_mut() += 1;
        }));

        observers.emit(&());
        assert!(observers.remove(id));
        // Stale ids are harmless.
        assert!(!observers.remove(id));
        observers.emit(&());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn reentrant_registration_takes_effect_next_emission() {
        let observers = Rc::new(Observers::new());
        let count = Rc::new(RefCell::new(0));

        let inner_observers = observers.clone();
        let inner_count = count.clone();
        observers.observe(Rc::new(move |_: &()| {
            let late_count = inner_count.clone();
            inner_observers.observe(Rc::new(move |_: &()| {
                *late_count.borrow_mut() += 1;
            }));
        }));

        observers.emit(&());
        // The observer registered during the first emission did not run yet.
        assert_eq!(*count.borrow(), 0);
        observers.emit(&());
        assert_eq!(*count.borrow(), 1);
    }
}
