// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered outside-click detection.
//!
//! ## Overview
//!
//! A [`ClickOutside`] effect calls its handler when a press and the matching
//! release both land outside its node. Outside-ness is adjudicated against a
//! shared [`LayerStack`]: only the most recently registered live layer may
//! claim an interaction, so a popover opened on top of a dialog swallows the
//! clicks that would otherwise dismiss the dialog.
//!
//! ## Event pipeline
//!
//! For each of the seven observed event kinds the effect registers two
//! listeners on the document:
//!
//! - capture: mark the kind as intercepted; presses also record whether this
//!   node was the topmost layer at press time, releases (re)start the
//!   [`INTERCEPT_RESET_MS`] reset.
//! - bubble: clear the intercepted mark and feed the debounced press or
//!   release evaluation.
//!
//! A native listener that stops propagation before the document bubble phase
//! leaves its kind intercepted, which suppresses outside detection until the
//! reset elapses. Press-family events (`pointerdown`, `mousedown`,
//! `touchstart`) for the same gesture coalesce through one
//! [`POINTER_DEBOUNCE_MS`] debounce, release-family events
//! (`pointerup`, `mouseup`, `touchend`, `click`) through another.
//!
//! ## Qualifying events
//!
//! An event qualifies as outside when it carries no non-primary button, its
//! target is a connected element, and the target is neither the node nor
//! inside it. An event whose target is not an element is ignored outright:
//! no handler call, no gesture state change.

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;
use understory_dom::{Document, Event, EventType, NodeId};
use understory_effect::{Debounced, Effect, EffectSet, ListenerOptions, Patch, debounce, on};

use crate::EventHandler;

/// Wait used to coalesce the press-family and release-family events of one gesture.
pub const POINTER_DEBOUNCE_MS: u64 = 10;

/// Wait after the last release-family capture before all intercepted marks are cleared.
pub const INTERCEPT_RESET_MS: u64 = 20;

const PRESS_EVENTS: [EventType; 3] = [
    EventType::PointerDown,
    EventType::MouseDown,
    EventType::TouchStart,
];

const RELEASE_EVENTS: [EventType; 4] = [
    EventType::PointerUp,
    EventType::MouseUp,
    EventType::TouchEnd,
    EventType::Click,
];

/// Registration-ordered set of active outside-click layers.
///
/// The last registered node is the topmost layer. Cloning yields another
/// handle to the same stack; share one stack between every [`ClickOutside`]
/// that should arbitrate with the others.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    layers: Rc<RefCell<Vec<NodeId>>>,
}

impl LayerStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` on top. A node already present keeps its position.
    ///
    /// Returns `true` if the node was inserted.
    pub fn push(&self, node: NodeId) -> bool {
        let mut layers = self.layers.borrow_mut();
        if layers.contains(&node) {
            return false;
        }
        layers.push(node);
        true
    }

    /// Unregister `node`. Returns `true` if it was present.
    pub fn remove(&self, node: NodeId) -> bool {
        let mut layers = self.layers.borrow_mut();
        match layers.iter().position(|&n| n == node) {
            Some(i) => {
                layers.remove(i);
                true
            }
            None => false,
        }
    }

    /// Whether `node` is the topmost layer.
    pub fn is_top(&self, node: NodeId) -> bool {
        self.top() == Some(node)
    }

    /// The topmost layer.
    pub fn top(&self) -> Option<NodeId> {
        self.layers.borrow().last().copied()
    }

    /// Whether `node` is registered.
    pub fn contains(&self, node: NodeId) -> bool {
        self.layers.borrow().contains(&node)
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.borrow().len()
    }

    /// Returns true when no layer is registered.
    pub fn is_empty(&self) -> bool {
        self.layers.borrow().is_empty()
    }
}

bitflags! {
    /// Event kinds whose capture listener ran more recently than their bubble listener.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InterceptedEvents: u8 {
        /// `pointerdown`.
        const POINTER_DOWN = 0b0000_0001;
        /// `pointerup`.
        const POINTER_UP   = 0b0000_0010;
        /// `mousedown`.
        const MOUSE_DOWN   = 0b0000_0100;
        /// `mouseup`.
        const MOUSE_UP     = 0b0000_1000;
        /// `touchstart`.
        const TOUCH_START  = 0b0001_0000;
        /// `touchend`.
        const TOUCH_END    = 0b0010_0000;
        /// `click`.
        const CLICK        = 0b0100_0000;
    }
}

impl InterceptedEvents {
    /// The flag for `ty`; empty for event kinds outside detection does not observe.
    pub fn from_event_type(ty: EventType) -> Self {
        match ty {
            EventType::PointerDown => Self::POINTER_DOWN,
            EventType::PointerUp => Self::POINTER_UP,
            EventType::MouseDown => Self::MOUSE_DOWN,
            EventType::MouseUp => Self::MOUSE_UP,
            EventType::TouchStart => Self::TOUCH_START,
            EventType::TouchEnd => Self::TOUCH_END,
            EventType::Click => Self::CLICK,
            _ => Self::empty(),
        }
    }
}

/// Progress of the interaction in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerGesture {
    /// A press was recorded and no release has resolved it yet.
    pub is_pointer_down: bool,
    /// The recorded press started inside the node.
    pub is_pointer_down_inside: bool,
}

/// Props for [`ClickOutside`].
#[derive(Clone)]
pub struct ClickOutsideProps {
    /// Called once per qualifying outside press + release.
    pub handler: EventHandler,
    /// Called when a qualifying outside press is recorded.
    pub on_start: Option<EventHandler>,
}

impl core::fmt::Debug for ClickOutsideProps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClickOutsideProps")
            .field("on_start", &self.on_start.is_some())
            .finish_non_exhaustive()
    }
}

impl ClickOutsideProps {
    /// Props with `handler` and no start callback.
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
            on_start: None,
        }
    }

    /// Set the start callback.
    pub fn with_on_start(mut self, on_start: impl Fn(&Event) + 'static) -> Self {
        self.on_start = Some(Rc::new(on_start));
        self
    }
}

/// Partial [`ClickOutsideProps`].
#[derive(Clone, Default)]
pub struct ClickOutsidePatch {
    /// Replacement handler.
    pub handler: Option<EventHandler>,
    /// Replacement start callback; `Some(None)` clears it.
    pub on_start: Option<Option<EventHandler>>,
}

impl core::fmt::Debug for ClickOutsidePatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClickOutsidePatch")
            .field("handler", &self.handler.is_some())
            .field("on_start", &self.on_start.as_ref().map(Option::is_some))
            .finish()
    }
}

impl From<ClickOutsideProps> for ClickOutsidePatch {
    fn from(props: ClickOutsideProps) -> Self {
        Self {
            handler: Some(props.handler),
            on_start: Some(props.on_start),
        }
    }
}

impl Patch for ClickOutsideProps {
    type Partial = ClickOutsidePatch;

    fn merge(&mut self, partial: ClickOutsidePatch) {
        if let Some(handler) = partial.handler {
            self.handler = handler;
        }
        if let Some(on_start) = partial.on_start {
            self.on_start = on_start;
        }
    }
}

#[derive(Debug, Default)]
struct State {
    intercepted: InterceptedEvents,
    gesture: PointerGesture,
    top_at_press: bool,
}

/// Outside-click detection for one node.
pub struct ClickOutside {
    doc: Document,
    node: NodeId,
    layers: LayerStack,
    props: ClickOutsideProps,
    state: Rc<RefCell<State>>,
    subscriptions: EffectSet,
    destroyed: bool,
}

impl core::fmt::Debug for ClickOutside {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClickOutside")
            .field("node", &self.node)
            .field("state", &self.state.borrow())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl ClickOutside {
    /// Register `node` as the topmost layer of `layers` and start listening.
    pub fn new(doc: &Document, node: NodeId, layers: &LayerStack, props: ClickOutsideProps) -> Self {
        let mut this = Self {
            doc: doc.clone(),
            node,
            layers: layers.clone(),
            props,
            state: Rc::new(RefCell::new(State::default())),
            subscriptions: EffectSet::new(),
            destroyed: false,
        };
        this.subscribe();
        this
    }

    /// The node this effect guards.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The gesture currently in flight.
    pub fn gesture(&self) -> PointerGesture {
        self.state.borrow().gesture
    }

    /// Event kinds currently marked as intercepted.
    pub fn intercepted(&self) -> InterceptedEvents {
        self.state.borrow().intercepted
    }

    fn subscribe(&mut self) {
        if self.layers.push(self.node) {
            tracing::debug!(node = ?self.node, depth = self.layers.len(), "layer registered");
        }
        self.state.borrow_mut().top_at_press = false;

        let doc = &self.doc;
        let root = doc.root();
        let mut set = EffectSet::new();

        let on_press = self.press_evaluator();
        let on_release = self.release_evaluator();
        let reset = {
            let state = self.state.clone();
            debounce(doc.scheduler(), INTERCEPT_RESET_MS, move |()| {
                state.borrow_mut().intercepted = InterceptedEvents::empty();
            })
        };

        for ty in PRESS_EVENTS {
            let flag = InterceptedEvents::from_event_type(ty);
            let (state, layers, node) = (self.state.clone(), self.layers.clone(), self.node);
            set.push_subscription(on(doc, root, ty, ListenerOptions::CAPTURE, move |_| {
                let mut state = state.borrow_mut();
                state.intercepted |= flag;
                state.top_at_press = layers.is_top(node);
            }));
        }
        for ty in RELEASE_EVENTS {
            let flag = InterceptedEvents::from_event_type(ty);
            let (state, reset) = (self.state.clone(), reset.clone());
            set.push_subscription(on(doc, root, ty, ListenerOptions::CAPTURE, move |_| {
                state.borrow_mut().intercepted |= flag;
                reset.call(());
            }));
        }
        for (events, evaluate) in [(&PRESS_EVENTS[..], &on_press), (&RELEASE_EVENTS[..], &on_release)] {
            for &ty in events {
                let flag = InterceptedEvents::from_event_type(ty);
                let (state, evaluate) = (self.state.clone(), evaluate.clone());
                set.push_subscription(on(doc, root, ty, ListenerOptions::BUBBLE, move |e| {
                    state.borrow_mut().intercepted.remove(flag);
                    evaluate.call(e.clone());
                }));
            }
        }

        set.push_debounced(&on_press);
        set.push_debounced(&on_release);
        set.push_debounced(&reset);
        self.subscriptions = set;
    }

    fn press_evaluator(&self) -> Debounced<Event> {
        let doc = self.doc.clone();
        let node = self.node;
        let state = self.state.clone();
        let on_start = self.props.on_start.clone();
        debounce(self.doc.scheduler(), POINTER_DEBOUNCE_MS, move |e: Event| {
            {
                let state = state.borrow();
                if !state.top_at_press || !state.intercepted.is_empty() {
                    return;
                }
            }
            let Some(target) = e.target().filter(|&t| doc.is_element(t)) else {
                return;
            };
            if let Some(on_start) = &on_start
                && is_outside_event(&doc, node, &e)
            {
                on_start(&e);
            }
            let mut state = state.borrow_mut();
            if doc.contains(node, target) {
                state.gesture.is_pointer_down_inside = true;
            }
            state.gesture.is_pointer_down = true;
        })
    }

    fn release_evaluator(&self) -> Debounced<Event> {
        let doc = self.doc.clone();
        let node = self.node;
        let state = self.state.clone();
        let handler = self.props.handler.clone();
        debounce(self.doc.scheduler(), POINTER_DEBOUNCE_MS, move |e: Event| {
            let fire = {
                let state = state.borrow();
                state.top_at_press
                    && state.intercepted.is_empty()
                    && state.gesture.is_pointer_down
                    && !state.gesture.is_pointer_down_inside
                    && is_outside_event(&doc, node, &e)
            };
            state.borrow_mut().gesture = PointerGesture::default();
            if fire {
                tracing::debug!(node = ?node, event = e.ty().as_str(), "outside click");
                handler(&e);
            }
        })
    }
}

impl Effect for ClickOutside {
    type Props = ClickOutsideProps;

    fn update(&mut self, partial: ClickOutsidePatch) {
        if self.destroyed {
            return;
        }
        self.subscriptions.destroy();
        self.props.merge(partial);
        self.subscribe();
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if self.layers.remove(self.node) {
            tracing::debug!(node = ?self.node, depth = self.layers.len(), "layer released");
        }
        self.subscriptions.destroy();
    }
}

/// Whether `event` qualifies as an interaction outside `node`.
pub fn is_outside_event(doc: &Document, node: NodeId, event: &Event) -> bool {
    if event.button().is_some_and(|b| b > 0) {
        return false;
    }
    let Some(target) = event.target() else {
        return false;
    };
    doc.is_element(target) && doc.is_connected(target) && !doc.contains(node, target)
}
