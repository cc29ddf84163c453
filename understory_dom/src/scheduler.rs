// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual-clock host scheduler: timeouts, deferred tasks, and settled signals.
//!
//! ## Overview
//!
//! Behaviors never read a wall clock. They post work here and the host drives
//! time forward:
//!
//! - [`Scheduler::set_timeout`] / [`Scheduler::clear_timeout`] mirror the
//!   browser timer API. Timers due at the same instant fire in scheduling order.
//! - [`Scheduler::post`] queues a deferred task (the "tick" after the current
//!   synchronous work). [`Scheduler::flush`] runs every queued task, including
//!   tasks posted while flushing.
//! - [`Scheduler::advance`] moves the clock and runs due timers, flushing the
//!   deferred queue before the first timer and after each one.
//!
//! [`Deferred`] is the single "settled" signal a caller can inspect after the
//! host has flushed.
//!
//! ```
//! use understory_dom::Scheduler;
//! use std::{cell::Cell, rc::Rc};
//!
//! let scheduler = Scheduler::new();
//! let hits = Rc::new(Cell::new(0));
//! let h = hits.clone();
//! scheduler.set_timeout(10, move || h.set(h.get() + 1));
//! scheduler.advance(9);
//! assert_eq!(hits.get(), 0);
//! scheduler.advance(1);
//! assert_eq!(hits.get(), 1);
//! ```

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::rc::Rc;
use core::cell::RefCell;

/// Identifier for a pending timeout.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimerId(u64);

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Clock {
    now: u64,
    next_timer: u64,
    // Keyed by (due, id) so equal deadlines keep scheduling order.
    timers: BTreeMap<(u64, u64), Task>,
    due: BTreeMap<u64, u64>,
    tasks: VecDeque<Task>,
}

/// Shared handle to a virtual clock and its task queues.
///
/// Cloning yields another handle to the same clock.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<Clock>>,
}

impl core::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let clock = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now", &clock.now)
            .field("pending_timers", &clock.timers.len())
            .field("pending_tasks", &clock.tasks.len())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Create a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    /// Run `f` once, `delay_ms` after the current time.
    pub fn set_timeout(&self, delay_ms: u64, f: impl FnOnce() + 'static) -> TimerId {
        let mut clock = self.inner.borrow_mut();
        clock.next_timer += 1;
        let id = clock.next_timer;
        let due = clock.now.saturating_add(delay_ms);
        clock.timers.insert((due, id), Box::new(f));
        clock.due.insert(id, due);
        TimerId(id)
    }

    /// Cancel a pending timeout.
    ///
    /// Returns `false` when the timer already fired or was already cleared;
    /// clearing twice is a no-op.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut clock = self.inner.borrow_mut();
        match clock.due.remove(&id.0) {
            Some(due) => clock.timers.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    /// Queue a deferred task to run on the next [`flush`](Self::flush).
    pub fn post(&self, f: impl FnOnce() + 'static) {
        self.inner.borrow_mut().tasks.push_back(Box::new(f));
    }

    /// Run every queued deferred task, including tasks queued meanwhile.
    ///
    /// Returns the number of tasks run.
    pub fn flush(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.inner.borrow_mut().tasks.pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }

    /// Advance the clock by `ms`, running every timer that comes due.
    ///
    /// Returns the number of timers and tasks run.
    pub fn advance(&self, ms: u64) -> usize {
        let mut ran = self.flush();
        let target = self.now().saturating_add(ms);
        loop {
            let next = {
                let mut clock = self.inner.borrow_mut();
                match clock.timers.keys().next().copied() {
                    Some((due, id)) if due <= target => {
                        clock.due.remove(&id);
                        clock.now = due;
                        clock.timers.remove(&(due, id))
                    }
                    _ => None,
                }
            };
            let Some(timer) = next else { break };
            timer();
            ran += 1 + self.flush();
        }
        let mut clock = self.inner.borrow_mut();
        clock.now = clock.now.max(target);
        ran
    }

    /// Number of timers not yet fired or cleared.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Number of deferred tasks waiting for a flush.
    pub fn pending_tasks(&self) -> usize {
        self.inner.borrow().tasks.len()
    }
}

/// A single-assignment settled signal.
///
/// Deferred work settles it once; observers poll it after the host flushed the
/// scheduler. Cloning yields another handle to the same slot.
pub struct Deferred<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Deferred")
            .field("value", &self.slot.borrow())
            .finish()
    }
}

impl<T> Deferred<T> {
    /// Create an unsettled signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle with `value`. The first value wins; returns `false` if already settled.
    pub fn settle(&self, value: T) -> bool {
        let mut slot = self.slot.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Whether a value has been recorded.
    pub fn is_settled(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl<T: Clone> Deferred<T> {
    /// A copy of the settled value, if any.
    pub fn get(&self) -> Option<T> {
        self.slot.borrow().clone()
    }
}
