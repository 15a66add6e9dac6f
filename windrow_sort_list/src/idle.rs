// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A cooperative idle-task queue.
//!
//! Windrow is single-threaded: background work is modeled as tasks on one
//! cooperative queue that the host pumps from its event loop (or a test
//! harness pumps directly). A task runs as one bounded, synchronous unit and
//! reports whether it wants another turn; there is no preemption, so
//! anything that happens between turns observes fully settled state.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

/// Whether an idle task wants to run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idle {
    /// Re-queue the task for another turn.
    Again,
    /// The task is finished and is dropped from the queue.
    Done,
}

/// Identifies a scheduled task within an [`IdleQueue`].
///
/// Ids are never reused within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A single-threaded cooperative task queue, shared by handle.
///
/// Hosts call [`IdleQueue::dispatch`] from their idle/low-priority scheduling
/// slot to run exactly one task turn, or [`IdleQueue::drain`] to run until no
/// work remains. [`IdleQueue::cancel`] removes a task synchronously: a
/// cancelled task's body never runs again.
pub struct IdleQueue {
    inner: Rc<QueueInner>,
}

struct QueueInner {
    tasks: RefCell<VecDeque<(TaskId, Rc<dyn Fn() -> Idle>)>>,
    next_id: Cell<u64>,
}

impl IdleQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(QueueInner {
                tasks: RefCell::new(VecDeque::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Schedules `task` and returns its id.
    pub fn add(&self, task: Rc<dyn Fn() -> Idle>) -> TaskId {
        let id = TaskId(self.inner.next_id.get());
        self.inner.next_id.set(self.inner.next_id.get() + 1);
        self.inner.tasks.borrow_mut().push_back((id, task));
        id
    }

    /// Removes a scheduled task.
    ///
    /// Returns `false` if `id` is not (or no longer) queued.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut tasks = self.inner.tasks.borrow_mut();
        let before = tasks.len();
        tasks.retain(|(task_id, _)| *task_id != id);
        tasks.len() != before
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    /// Returns `true` if no tasks are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.tasks.borrow().is_empty()
    }

    /// Runs one task turn.
    ///
    /// Returns `false` if the queue was empty. The task runs with the queue
    /// unborrowed, so it may schedule or cancel tasks (including itself).
    pub fn dispatch(&self) -> bool {
        let front = self.inner.tasks.borrow_mut().pop_front();
        let Some((id, task)) = front else {
            return false;
        };
        match task() {
            Idle::Again => self.inner.tasks.borrow_mut().push_back((id, task)),
            Idle::Done => {}
        }
        true
    }

    /// Runs task turns until the queue is empty; returns the number of turns.
    pub fn drain(&self) -> usize {
        let mut turns = 0;
        while self.dispatch() {
            turns += 1;
        }
        turns
    }
}

impl Default for IdleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for IdleQueue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for IdleQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleQueue")
            .field("len", &self.len())
            .field("next_id", &self.inner.next_id.get())
            .finish()
    }
}
