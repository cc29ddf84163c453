// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard shortcuts on a node.
//!
//! Handlers are keyed by the event's `code`, falling back to `key` when no code
//! is present. A space key reported as `" "` is looked up as `"Space"`.

use std::collections::BTreeMap;
use std::rc::Rc;

use understory_dom::{Document, Event, EventType, NodeId};
use understory_effect::{Effect, ListenerOptions, Patch, Subscription, on};

use crate::EventHandler;

/// Key name the handler table is looked up with.
pub fn key_name(event: &Event) -> Option<&str> {
    let key = event
        .code()
        .filter(|code| !code.is_empty())
        .or_else(|| event.key())?;
    Some(if key == " " { "Space" } else { key })
}

/// Props for [`Keydown`].
#[derive(Clone, Default)]
pub struct KeydownProps {
    /// Handlers by key name.
    pub handlers: BTreeMap<String, EventHandler>,
}

impl core::fmt::Debug for KeydownProps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl KeydownProps {
    /// An empty handler table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the handler for `key`.
    pub fn on(mut self, key: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.handlers.insert(key.into(), Rc::new(handler));
        self
    }
}

/// Partial [`KeydownProps`].
#[derive(Clone, Debug, Default)]
pub struct KeydownPatch {
    /// Replacement handler table.
    pub handlers: Option<KeydownProps>,
}

impl From<KeydownProps> for KeydownPatch {
    fn from(props: KeydownProps) -> Self {
        Self {
            handlers: Some(props),
        }
    }
}

impl Patch for KeydownProps {
    type Partial = KeydownPatch;

    fn merge(&mut self, partial: KeydownPatch) {
        if let Some(props) = partial.handlers {
            *self = props;
        }
    }
}

/// Dispatches `keydown` events on a node to a handler table.
#[derive(Debug)]
pub struct Keydown {
    doc: Document,
    node: NodeId,
    props: KeydownProps,
    subscription: Subscription,
    destroyed: bool,
}

impl Keydown {
    /// Start listening on `node`.
    pub fn new(doc: &Document, node: NodeId, props: KeydownProps) -> Self {
        let subscription = subscribe(doc, node, &props);
        Self {
            doc: doc.clone(),
            node,
            props,
            subscription,
            destroyed: false,
        }
    }
}

fn subscribe(doc: &Document, node: NodeId, props: &KeydownProps) -> Subscription {
    let handlers = props.handlers.clone();
    on(doc, node, EventType::KeyDown, ListenerOptions::BUBBLE, move |e| {
        if let Some(handler) = key_name(e).and_then(|k| handlers.get(k)) {
            handler(e);
        }
    })
}

impl Effect for Keydown {
    type Props = KeydownProps;

    fn update(&mut self, partial: KeydownPatch) {
        if self.destroyed {
            return;
        }
        self.props.merge(partial);
        self.subscription.destroy();
        self.subscription = subscribe(&self.doc, self.node, &self.props);
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.subscription.destroy();
    }
}

/// A [`Keydown`] with a single `Escape` handler.
pub fn escape_keydown(doc: &Document, node: NodeId, handler: impl Fn(&Event) + 'static) -> Keydown {
    Keydown::new(doc, node, KeydownProps::new().on("Escape", handler))
}
