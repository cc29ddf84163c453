// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener subscriptions with explicit teardown.

use understory_dom::{Document, Event, EventType, ListenerId, NodeId};

/// Options for [`on`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listen during the capture phase instead of target/bubble.
    pub capture: bool,
}

impl ListenerOptions {
    /// Capture-phase listening.
    pub const CAPTURE: Self = Self { capture: true };
    /// Target/bubble-phase listening.
    pub const BUBBLE: Self = Self { capture: false };
}

/// Register `handler` for `ty` events on `target`.
///
/// The listener stays registered until the returned [`Subscription`] is
/// destroyed. Dropping the subscription does not remove the listener.
pub fn on(
    doc: &Document,
    target: NodeId,
    ty: EventType,
    options: ListenerOptions,
    handler: impl Fn(&Event) + 'static,
) -> Subscription {
    let id = doc.add_event_listener(target, ty, options.capture, handler);
    Subscription {
        doc: doc.clone(),
        target,
        ty,
        id: Some(id),
    }
}

/// A registered listener. [`destroy`](Subscription::destroy) removes it.
#[derive(Debug)]
pub struct Subscription {
    doc: Document,
    target: NodeId,
    ty: EventType,
    id: Option<ListenerId>,
}

impl Subscription {
    /// Remove the listener. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(id) = self.id.take() {
            self.doc.remove_event_listener(self.target, id);
        }
    }

    /// Returns true until [`destroy`](Self::destroy) is called.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// The event type listened for.
    pub fn event_type(&self) -> EventType {
        self.ty
    }
}
