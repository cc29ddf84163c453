// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_behaviors --heading-base-level=0

//! Understory Behaviors: headless interactive behaviors built on [`understory_effect`].
//!
//! Every behavior here is an [`Effect`](understory_effect::Effect): construct
//! it against a node, feed it partial props with `update`, and `destroy` it
//! when the node goes away. Behaviors touch the host only through
//! [`understory_dom::Document`], so they run the same in tests and in a real
//! host adapter.
//!
//! ## Behaviors
//!
//! - [`ClickOutside`]: layered outside-click detection. Instances sharing a
//!   [`LayerStack`] arbitrate so that only the topmost layer reacts.
//! - [`Keydown`] / [`escape_keydown`]: keyboard shortcuts by key name.
//! - [`AutoFocus`]: focus the first [`Tabbable`] descendant, restore on destroy.
//! - [`Inert`]: mark everything outside a node `inert`.
//! - [`Portal`]: move a node under a target container.
//! - [`Floating`]: position a node against a reference through a [`PositionEngine`].
//!
//! ## Widget builders
//!
//! - [`Checkbox`] and [`Switch`]: trigger plus hidden form input.
//! - [`icon`]: `aria-hidden` decoration.
//!
//! ## Example
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//! use understory_behaviors::{ClickOutside, ClickOutsideProps, LayerStack, POINTER_DEBOUNCE_MS};
//! use understory_dom::{Document, Event, EventType};
//! use understory_effect::Effect;
//!
//! let doc = Document::new();
//! let dialog = doc.create_element("div");
//! let outside = doc.create_element("button");
//! doc.append_child(doc.body(), dialog).unwrap();
//! doc.append_child(doc.body(), outside).unwrap();
//!
//! let dismissed = Rc::new(Cell::new(false));
//! let d = dismissed.clone();
//! let layers = LayerStack::new();
//! let mut effect = ClickOutside::new(
//!     &doc,
//!     dialog,
//!     &layers,
//!     ClickOutsideProps::new(move |_| d.set(true)),
//! );
//!
//! doc.dispatch(outside, Event::new(EventType::PointerDown).with_button(0));
//! doc.scheduler().advance(POINTER_DEBOUNCE_MS);
//! doc.dispatch(outside, Event::new(EventType::PointerUp).with_button(0));
//! doc.scheduler().advance(POINTER_DEBOUNCE_MS);
//! assert!(dismissed.get());
//!
//! effect.destroy();
//! assert!(layers.is_empty());
//! ```

use std::rc::Rc;

use understory_dom::Event;

mod auto_focus;
mod checkbox;
mod click_outside;
mod floating;
mod icon;
mod inert;
mod keydown;
mod portal;
mod switch;

/// Shared event callback.
pub type EventHandler = Rc<dyn Fn(&Event)>;

pub use auto_focus::{AutoFocus, AutoFocusPatch, AutoFocusProps, DefaultTabbable, Tabbable};
pub use checkbox::{
    ChangeHandler, Checkbox, CheckboxPatch, CheckboxProps, checkbox_trigger, hidden_input,
    hidden_input_attributes, trigger_attributes,
};
pub use click_outside::{
    ClickOutside, ClickOutsidePatch, ClickOutsideProps, INTERCEPT_RESET_MS, InterceptedEvents,
    LayerStack, POINTER_DEBOUNCE_MS, PointerGesture, is_outside_event,
};
pub use floating::{
    ARROW_PADDING, Alignment, ArrowPosition, BasicEngine, DEFAULT_GUTTER,
    DEFAULT_OVERFLOW_PADDING, Floating, FloatingPatch, FloatingProps, Middleware, OffsetOptions,
    Placement, Position, PositionEngine, PositionRequest, Side, Strategy, middleware,
};
pub use icon::{attach_icon, icon};
pub use inert::Inert;
pub use keydown::{Keydown, KeydownPatch, KeydownProps, escape_keydown, key_name};
pub use portal::{Portal, PortalError, PortalStatus, PortalTarget};
pub use switch::{Switch, switch_trigger};
