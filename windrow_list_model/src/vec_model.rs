// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A mutable, observable list model backed by a vector.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::{Delta, ListModel, ObserverId, Observers};

/// A mutable [`ListModel`] backed by a `Vec`, shared by handle.
///
/// Every mutation settles the collection first and then emits exactly one
/// [`Delta`] describing it. Mutations that change nothing (for example an
/// empty [`VecModel::splice`]) emit nothing.
///
/// Mutating methods follow `Vec` conventions and panic on out-of-range
/// positions; reads go through [`ListModel::get`] and return `None` instead.
pub struct VecModel<T> {
    inner: Rc<VecModelInner<T>>,
}

struct VecModelInner<T> {
    items: RefCell<Vec<T>>,
    observers: Observers<Delta>,
}

impl<T: Clone> VecModel<T> {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::from_items([])
    }

    /// Creates a model holding `items`.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            inner: Rc::new(VecModelInner {
                items: RefCell::new(items.into_iter().collect()),
                observers: Observers::new(),
            }),
        }
    }

    /// Appends `item` at the end.
    pub fn push(&self, item: T) {
        let position = {
            let mut items = self.inner.items.borrow_mut();
            items.push(item);
            items.len() - 1
        };
        self.inner.observers.emit(&Delta::insertion(position, 1));
    }

    /// Inserts `item` at `position`, shifting later items up.
    pub fn insert(&self, position: usize, item: T) {
        self.inner.items.borrow_mut().insert(position, item);
        self.inner.observers.emit(&Delta::insertion(position, 1));
    }

    /// Removes and returns the item at `position`, shifting later items down.
    pub fn remove(&self, position: usize) -> T {
        let item = self.inner.items.borrow_mut().remove(position);
        self.inner.observers.emit(&Delta::removal(position, 1));
        item
    }

    /// Replaces the item at `position`.
    pub fn set(&self, position: usize, item: T) {
        self.inner.items.borrow_mut()[position] = item;
        self.inner.observers.emit(&Delta::replacement(position, 1));
    }

    /// Replaces the `n_removed` items at `position` with `items`.
    ///
    /// This is the general edit; the other mutators are conveniences over it.
    /// A splice that removes nothing and adds nothing emits nothing.
    pub fn splice(&self, position: usize, n_removed: usize, items: impl IntoIterator<Item = T>) {
        let added = {
            let mut current = self.inner.items.borrow_mut();
            assert!(
                position + n_removed <= current.len(),
                "splice range out of bounds"
            );
            let added: Vec<T> = items.into_iter().collect();
            let n_added = added.len();
            current.splice(position..position + n_removed, added);
            n_added
        };
        let delta = Delta::new(position, n_removed, added);
        if !delta.is_empty() {
            self.inner.observers.emit(&delta);
        }
    }

    /// Returns a snapshot of the current items.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }
}

impl<T: Clone> Default for VecModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for VecModel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for VecModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecModel")
            .field("items", &self.inner.items.borrow())
            .field("observers", &self.inner.observers)
            .finish()
    }
}

impl<T: Clone + 'static> ListModel for VecModel<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    fn get(&self, position: usize) -> Option<T> {
        self.inner.items.borrow().get(position).cloned()
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
