// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle contract shared by every behavior.
//!
//! An effect is attached once to a node with full props, receives zero or more
//! partial updates, and is destroyed at most once. After `destroy` the effect
//! has released every listener, timer and mutation hook it registered, and any
//! further `update` is ignored.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::debounce::Debounced;
use crate::on::Subscription;

/// Props that accept partial updates.
///
/// `Partial` carries only the fields the caller wants to change; `merge` writes
/// them over `self` and leaves every other field untouched.
pub trait Patch {
    /// The partial form of these props.
    type Partial;

    /// Overwrite the fields present in `partial`.
    fn merge(&mut self, partial: Self::Partial);
}

impl Patch for () {
    type Partial = ();

    fn merge(&mut self, _partial: ()) {}
}

/// A live behavior attached to a node.
pub trait Effect {
    /// The props this effect was constructed with.
    type Props: Patch;

    /// Merge `partial` into the current props and re-apply.
    ///
    /// Ignored after [`destroy`](Effect::destroy).
    fn update(&mut self, partial: <Self::Props as Patch>::Partial);

    /// Release everything this effect registered. Idempotent.
    fn destroy(&mut self);
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    type Props = E::Props;

    fn update(&mut self, partial: <E::Props as Patch>::Partial) {
        (**self).update(partial);
    }

    fn destroy(&mut self) {
        (**self).destroy();
    }
}

/// An ordered bag of teardown actions.
///
/// Behaviors collect every listener subscription and debounced callback they
/// create here, then release them all with one [`destroy`](EffectSet::destroy).
/// Teardowns run in registration order.
#[derive(Default)]
pub struct EffectSet {
    teardowns: Vec<Box<dyn FnOnce()>>,
}

impl core::fmt::Debug for EffectSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectSet")
            .field("len", &self.teardowns.len())
            .finish()
    }
}

impl EffectSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an arbitrary teardown.
    pub fn push(&mut self, teardown: impl FnOnce() + 'static) {
        self.teardowns.push(Box::new(teardown));
    }

    /// Register an effect to be destroyed with the set.
    pub fn push_effect<E: Effect + 'static>(&mut self, mut effect: E) {
        self.push(move || effect.destroy());
    }

    /// Register a listener subscription.
    pub fn push_subscription(&mut self, mut subscription: Subscription) {
        self.push(move || subscription.destroy());
    }

    /// Register a debounced callback; its pending call is cancelled on teardown.
    pub fn push_debounced<A: 'static>(&mut self, debounced: &Debounced<A>) {
        let debounced = debounced.clone();
        self.push(move || debounced.cancel());
    }

    /// Number of registered teardowns.
    pub fn len(&self) -> usize {
        self.teardowns.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.teardowns.is_empty()
    }

    /// Run and drop every teardown. Calling again is a no-op.
    pub fn destroy(&mut self) {
        for teardown in core::mem::take(&mut self.teardowns) {
            teardown();
        }
    }
}

impl Effect for EffectSet {
    type Props = ();

    fn update(&mut self, _partial: ()) {}

    fn destroy(&mut self) {
        Self::destroy(self);
    }
}
