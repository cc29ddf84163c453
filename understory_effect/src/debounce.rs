// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge debouncing.
//!
//! ## Overview
//!
//! [`debounce`] wraps a callback so that a burst of calls collapses into a
//! single invocation with the arguments of the last call, `wait_ms` after the
//! burst ends. Each call cancels the pending timer and starts a new one.
//!
//! [`DebouncedEffect`] applies the same idea to whole effects: construction
//! and every update are postponed, and a rebuild destroys the previous inner
//! effect before the next one is created.
//!
//! ```
//! use understory_dom::Scheduler;
//! use understory_effect::debounce;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let scheduler = Scheduler::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let s = seen.clone();
//! let log = debounce(&scheduler, 10, move |n: u32| s.borrow_mut().push(n));
//!
//! log.call(1);
//! log.call(2);
//! log.call(3);
//! scheduler.advance(10);
//! assert_eq!(*seen.borrow(), [3]);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use understory_dom::{Scheduler, TimerId};

use crate::effect::{Effect, Patch};

/// Default wait for debounced effects, in milliseconds.
pub const DEFAULT_WAIT_MS: u64 = 500;

struct Inner<A> {
    scheduler: Scheduler,
    wait_ms: u64,
    callback: Box<dyn Fn(A)>,
    pending: Cell<Option<TimerId>>,
}

/// A debounced callback. Cloning yields another handle to the same timer.
pub struct Debounced<A> {
    inner: Rc<Inner<A>>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A> core::fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Debounced")
            .field("wait_ms", &self.inner.wait_ms)
            .field("pending", &self.inner.pending.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Wrap `callback` so it runs `wait_ms` after the last of a burst of calls.
pub fn debounce<A: 'static>(
    scheduler: &Scheduler,
    wait_ms: u64,
    callback: impl Fn(A) + 'static,
) -> Debounced<A> {
    Debounced {
        inner: Rc::new(Inner {
            scheduler: scheduler.clone(),
            wait_ms,
            callback: Box::new(callback),
            pending: Cell::new(None),
        }),
    }
}

impl<A: 'static> Debounced<A> {
    /// Restart the wait; when it elapses, the callback receives `args`.
    pub fn call(&self, args: A) {
        self.cancel();
        let inner = self.inner.clone();
        let id = self.inner.scheduler.set_timeout(self.inner.wait_ms, move || {
            inner.pending.set(None);
            (inner.callback)(args);
        });
        self.inner.pending.set(Some(id));
    }

    /// Drop the pending call, if any. The handle stays usable.
    pub fn cancel(&self) {
        if let Some(id) = self.inner.pending.take() {
            self.inner.scheduler.clear_timeout(id);
        }
    }

    /// Whether a call is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    /// The configured wait in milliseconds.
    pub fn wait_ms(&self) -> u64 {
        self.inner.wait_ms
    }
}

/// An effect whose construction and updates are debounced.
///
/// Nothing is built until `wait_ms` has elapsed without further updates. Each
/// rebuild destroys the previous inner effect first, so at most one inner
/// effect is live at a time.
pub struct DebouncedEffect<P, E> {
    scheduler: Scheduler,
    wait_ms: u64,
    props: P,
    factory: Rc<dyn Fn(P) -> E>,
    live: Rc<RefCell<Option<E>>>,
    timer: Option<TimerId>,
    destroyed: bool,
}

impl<P: core::fmt::Debug, E> core::fmt::Debug for DebouncedEffect<P, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebouncedEffect")
            .field("wait_ms", &self.wait_ms)
            .field("props", &self.props)
            .field("scheduled", &self.timer.is_some())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<P, E> DebouncedEffect<P, E>
where
    P: Patch + Clone + 'static,
    E: Effect + 'static,
{
    /// Schedule `factory(props)` to run after `wait_ms`.
    pub fn new(
        scheduler: &Scheduler,
        wait_ms: u64,
        props: P,
        factory: impl Fn(P) -> E + 'static,
    ) -> Self {
        let mut effect = Self {
            scheduler: scheduler.clone(),
            wait_ms,
            props,
            factory: Rc::new(factory),
            live: Rc::new(RefCell::new(None)),
            timer: None,
            destroyed: false,
        };
        effect.schedule();
        effect
    }

    /// Whether an inner effect is currently built.
    pub fn is_live(&self) -> bool {
        self.live.borrow().is_some()
    }

    /// The merged props the next rebuild will use.
    pub fn props(&self) -> &P {
        &self.props
    }

    fn cancel(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.clear_timeout(id);
        }
    }

    fn schedule(&mut self) {
        self.cancel();
        let props = self.props.clone();
        let factory = self.factory.clone();
        let live = self.live.clone();
        self.timer = Some(self.scheduler.set_timeout(self.wait_ms, move || {
            let previous = live.borrow_mut().take();
            if let Some(mut previous) = previous {
                previous.destroy();
            }
            let next = factory(props);
            *live.borrow_mut() = Some(next);
        }));
    }
}

impl<P, E> Effect for DebouncedEffect<P, E>
where
    P: Patch + Clone + 'static,
    E: Effect + 'static,
{
    type Props = P;

    fn update(&mut self, partial: P::Partial) {
        if self.destroyed {
            return;
        }
        self.props.merge(partial);
        self.schedule();
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.cancel();
        let live = self.live.borrow_mut().take();
        if let Some(mut live) = live {
            live.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn burst_collapses_to_last_arguments() {
        let s = Scheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let d = debounce(&s, 10, move |n: u32| log.borrow_mut().push(n));
        d.call(1);
        s.advance(5);
        d.call(2);
        s.advance(9);
        assert!(seen.borrow().is_empty());
        assert!(d.is_pending());
        s.advance(1);
        assert_eq!(*seen.borrow(), [2]);
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_drops_pending_call_and_handle_stays_usable() {
        let s = Scheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let d = debounce(&s, 10, move |()| h.set(h.get() + 1));
        d.call(());
        d.cancel();
        d.cancel();
        s.advance(50);
        assert_eq!(hits.get(), 0);
        d.call(());
        s.advance(10);
        assert_eq!(hits.get(), 1);
    }

    #[derive(Clone, Debug, Default)]
    struct Props {
        label: u32,
    }

    impl Patch for Props {
        type Partial = u32;

        fn merge(&mut self, partial: u32) {
            self.label = partial;
        }
    }

    struct Probe {
        label: u32,
        log: Rc<RefCell<Vec<(&'static str, u32)>>>,
    }

    impl Effect for Probe {
        type Props = Props;

        fn update(&mut self, partial: u32) {
            self.label = partial;
        }

        fn destroy(&mut self) {
            self.log.borrow_mut().push(("destroy", self.label));
        }
    }

    #[test]
    fn rebuild_destroys_previous_inner_effect() {
        let s = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let mut effect = DebouncedEffect::new(&s, DEFAULT_WAIT_MS, Props { label: 1 }, move |p| {
            l.borrow_mut().push(("build", p.label));
            Probe {
                label: p.label,
                log: l.clone(),
            }
        });
        s.advance(DEFAULT_WAIT_MS - 1);
        assert!(!effect.is_live());
        s.advance(1);
        assert!(effect.is_live());

        effect.update(2);
        effect.update(3);
        s.advance(DEFAULT_WAIT_MS);
        assert_eq!(
            *log.borrow(),
            [("build", 1), ("destroy", 1), ("build", 3)]
        );

        effect.destroy();
        effect.destroy();
        effect.update(4);
        s.advance(DEFAULT_WAIT_MS);
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(log.borrow()[3], ("destroy", 3));
    }

    #[test]
    fn destroy_before_first_build_builds_nothing() {
        let s = Scheduler::new();
        let built = Rc::new(Cell::new(false));
        let b = built.clone();
        let mut effect = DebouncedEffect::new(&s, 10, (), move |()| {
            b.set(true);
            crate::EffectSet::new()
        });
        effect.destroy();
        s.advance(100);
        assert!(!built.get());
        assert_eq!(s.pending_timers(), 0);
    }
}
