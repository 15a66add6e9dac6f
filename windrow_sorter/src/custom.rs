// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A sorter wrapping a caller-supplied comparison function.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::cmp::Ordering;
use core::fmt;

use windrow_list_model::{ObserverId, Observers};

use crate::{OrderClass, Sorter, SorterChange};

/// A [`Sorter`] around an arbitrary comparison function, replaceable at
/// runtime.
///
/// This is the adapter between ad-hoc comparison logic and the [`Sorter`]
/// capability. The comparison may close over context; when it does, the
/// context is dropped exactly once, together with the last handle onto this
/// sorter — the Rust rendering of a "function, user data, release callback"
/// triple.
///
/// Replacing the comparison with [`CustomSorter::set_compare`] notifies
/// observers with the caller's [`SorterChange`] classification, so consumers
/// can skip re-sorting when a swap is declared [`SorterChange::Unchanged`].
pub struct CustomSorter<T> {
    inner: Rc<CustomSorterInner<T>>,
}

struct CustomSorterInner<T> {
    compare: RefCell<Rc<dyn Fn(&T, &T) -> Ordering>>,
    order: Cell<OrderClass>,
    observers: Observers<SorterChange>,
}

impl<T> CustomSorter<T> {
    /// Creates a sorter from a comparison function, declaring a total order.
    #[must_use]
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self::with_order(compare, OrderClass::Total)
    }

    /// Creates a sorter declaring the given [`OrderClass`].
    #[must_use]
    pub fn with_order(
        compare: impl Fn(&T, &T) -> Ordering + 'static,
        order: OrderClass,
    ) -> Self {
        Self {
            inner: Rc::new(CustomSorterInner {
                compare: RefCell::new(Rc::new(compare)),
                order: Cell::new(order),
                observers: Observers::new(),
            }),
        }
    }

    /// Creates a sorter from a comparison function over an owned context.
    ///
    /// The context is dropped exactly once, when the last handle onto this
    /// sorter (or a comparison installed later over the same context) goes
    /// away.
    #[must_use]
    pub fn with_context<C: 'static>(
        compare: impl Fn(&T, &T, &C) -> Ordering + 'static,
        context: C,
    ) -> Self {
        Self::new(move |a, b| compare(a, b, &context))
    }

    /// A sorter that declares no ordering at all.
    ///
    /// Sort stages fed this sorter stay in (or return to) pass-through mode.
    #[must_use]
    pub fn unordered() -> Self {
        Self::with_order(|_, _| Ordering::Equal, OrderClass::None)
    }

    /// Replaces the comparison function and notifies observers.
    ///
    /// `change` classifies the swap; pass [`SorterChange::Unchanged`] when
    /// the new function sorts identically (consumers then skip re-sorting).
    pub fn set_compare(
        &self,
        compare: impl Fn(&T, &T) -> Ordering + 'static,
        change: SorterChange,
    ) {
        *self.inner.compare.borrow_mut() = Rc::new(compare);
        self.inner.observers.emit(&change);
    }

    /// Changes the declared [`OrderClass`], notifying observers with
    /// [`SorterChange::Different`] if it actually changed.
    pub fn set_order(&self, order: OrderClass) {
        if self.inner.order.get() == order {
            return;
        }
        self.inner.order.set(order);
        self.inner.observers.emit(&SorterChange::Different);
    }
}

impl<T> Clone for CustomSorter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for CustomSorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSorter")
            .field("order", &self.inner.order.get())
            .field("observers", &self.inner.observers)
            .finish()
    }
}

impl<T: 'static> Sorter for CustomSorter<T> {
    type Item = T;

    fn compare(&self, a: &T, b: &T) -> Ordering {
        // Clone the function handle first so user code runs unborrowed.
        let compare = self.inner.compare.borrow().clone();
        compare(a, b)
    }

    fn order(&self) -> OrderClass {
        self.inner.order.get()
    }

    fn observe(&self, observer: Rc<dyn Fn(&SorterChange)>) -> Option<ObserverId> {
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
    use super::CustomSorter;
    use crate::{OrderClass, Sorter, SorterChange};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use core::cmp::Ordering;

    #[test]
    fn compares_through_the_wrapped_function() {
        let sorter = CustomSorter::new(|a: &u32, b: &u32| b.cmp(a));
        assert_eq!(sorter.compare(&1, &2), Ordering::Greater);
        assert_eq!(sorter.order(), OrderClass::Total);
    }

    #[test]
    fn context_is_released_exactly_once() {
        struct Context {
            drops: Rc<Cell<u32>>,
        }
        impl Drop for Context {
            fn drop(&mut self) {
                self.drops.set(self.drops.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let sorter = CustomSorter::with_context(
            |a: &u32, b: &u32, _ctx: &Context| a.cmp(b),
            Context {
                drops: drops.clone(),
            },
        );
        let second = sorter.clone();
        assert_eq!(sorter.compare(&1, &2), Ordering::Less);

        drop(sorter);
        assert_eq!(drops.get(), 0);
        drop(second);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn set_compare_notifies_with_classification() {
        let sorter = CustomSorter::new(|a: &u32, b: &u32| a.cmp(b));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        sorter.observe(Rc::new(move |change: &SorterChange| {
            sink.borrow_mut().push(*change);
        }));

        sorter.set_compare(|a, b| b.cmp(a), SorterChange::Different);
        sorter.set_compare(|a, b| b.cmp(a), SorterChange::Unchanged);
        assert_eq!(
            *seen.borrow(),
            [SorterChange::Different, SorterChange::Unchanged]
        );
        assert_eq!(sorter.compare(&1, &2), Ordering::Greater);
    }

    #[test]
    fn unordered_declares_no_order() {
        let sorter = CustomSorter::<u32>::unordered();
        assert_eq!(sorter.order(), OrderClass::None);
        assert_eq!(sorter.compare(&3, &1), Ordering::Equal);
    }

    #[test]
    fn identity_is_by_handle() {
        let a = CustomSorter::new(|a: &u32, b: &u32| a.cmp(b));
        let b = a.clone();
        let c = CustomSorter::new(|a: &u32, b: &u32| a.cmp(b));
        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
    }
}
