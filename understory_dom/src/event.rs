// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event types, propagation phases, and the event payload handed to listeners.

use alloc::string::String;
use core::cell::Cell;

use crate::types::NodeId;

/// Native event kinds the document can dispatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventType {
    /// `pointerdown`.
    PointerDown,
    /// `pointerup`.
    PointerUp,
    /// `mousedown`.
    MouseDown,
    /// `mouseup`.
    MouseUp,
    /// `touchstart`.
    TouchStart,
    /// `touchend`.
    TouchEnd,
    /// `click`.
    Click,
    /// `keydown`.
    KeyDown,
    /// `keyup`.
    KeyUp,
    /// `scroll`.
    Scroll,
    /// `resize`.
    Resize,
    /// `focus`.
    Focus,
}

impl EventType {
    /// The lowercase DOM name of the event.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Focus => "focus",
        }
    }

    /// Returns true for events that carry a mouse `button` field.
    pub const fn is_mouse_like(self) -> bool {
        matches!(
            self,
            Self::PointerDown | Self::PointerUp | Self::MouseDown | Self::MouseUp | Self::Click
        )
    }

    /// Whether events of this type bubble unless configured otherwise.
    pub const fn bubbles_by_default(self) -> bool {
        !matches!(self, Self::Scroll | Self::Resize | Self::Focus)
    }
}

/// Phases of event propagation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Phase {
    /// Not currently being dispatched.
    #[default]
    None,
    /// Root-to-target traversal.
    Capture,
    /// Target node.
    Target,
    /// Target-to-root traversal.
    Bubble,
}

/// An event payload.
///
/// Construct with [`Event::new`] (or the helpers), then hand it to
/// [`Document::dispatch`](crate::Document::dispatch). The document fills in
/// [`target`](Event::target), [`current_target`](Event::current_target) and
/// [`phase`](Event::phase) while it walks the propagation path.
#[derive(Clone, Debug)]
pub struct Event {
    ty: EventType,
    bubbles: bool,
    button: Option<i16>,
    key: Option<String>,
    code: Option<String>,
    forced_target: Option<Option<NodeId>>,
    pub(crate) target: Option<NodeId>,
    pub(crate) current_target: Option<NodeId>,
    pub(crate) phase: Phase,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Create an event of the given type with default bubbling.
    ///
    /// Mouse-like events start with the primary button (`0`).
    pub fn new(ty: EventType) -> Self {
        Self {
            ty,
            bubbles: ty.bubbles_by_default(),
            button: ty.is_mouse_like().then_some(0),
            key: None,
            code: None,
            forced_target: None,
            target: None,
            current_target: None,
            phase: Phase::None,
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// Create a `keydown` event carrying `key`.
    pub fn key_down(key: &str) -> Self {
        Self::new(EventType::KeyDown).with_key(key)
    }

    /// Override bubbling.
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Set the mouse button. Ignored for events that are not mouse-like.
    pub fn with_button(mut self, button: i16) -> Self {
        if self.ty.is_mouse_like() {
            self.button = Some(button);
        }
        self
    }

    /// Set the `key` field.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the `code` field.
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Replace the target reported to listeners, regardless of where the event is dispatched.
    ///
    /// `None` reports a null target.
    pub fn with_target(mut self, target: Option<NodeId>) -> Self {
        self.forced_target = Some(target);
        self
    }

    pub(crate) fn forced_target(&self) -> Option<Option<NodeId>> {
        self.forced_target
    }

    /// The event type.
    pub fn ty(&self) -> EventType {
        self.ty
    }

    /// Whether the event bubbles.
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// The mouse button for mouse-like events; `None` for all others.
    pub fn button(&self) -> Option<i16> {
        self.button
    }

    /// The `key` field, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The `code` field, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The node the event was dispatched at, or `None` for a null target.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The node whose listener is currently running.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// The current propagation phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stop propagation after the listeners of the current node have run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Mark the default action as prevented.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_like_events_default_to_primary_button() {
        assert_eq!(Event::new(EventType::PointerDown).button(), Some(0));
        assert_eq!(Event::new(EventType::Click).button(), Some(0));
        assert_eq!(Event::new(EventType::TouchStart).button(), None);
        assert_eq!(
            Event::new(EventType::TouchEnd).with_button(2).button(),
            None,
            "touch events have no button field"
        );
    }

    #[test]
    fn scroll_and_resize_do_not_bubble() {
        assert!(!Event::new(EventType::Scroll).bubbles());
        assert!(!Event::new(EventType::Resize).bubbles());
        assert!(Event::new(EventType::MouseUp).bubbles());
    }

    #[test]
    fn flags_are_shared_through_shared_refs() {
        let ev = Event::key_down("Enter");
        let r = &ev;
        r.prevent_default();
        r.stop_propagation();
        assert!(ev.default_prevented());
        assert!(ev.propagation_stopped());
        assert_eq!(ev.key(), Some("Enter"));
    }
}
