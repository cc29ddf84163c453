// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dom --heading-base-level=0

//! Understory DOM: an in-memory document host for headless UI behaviors.
//!
//! Headless behaviors (outside-click detection, focus management, portals,
//! floating positioning) need a small set of host services: a node tree with
//! attributes, native-style event propagation, focus, and a clock. This crate
//! provides exactly that surface, deterministically, so behaviors can be built
//! and tested without a browser.
//!
//! ## Not a browser
//!
//! There is no layout, no rendering, and no CSS cascade. Hosts record the
//! rectangles they computed elsewhere with [`Document::set_rect`]; inline style
//! is plain key/value storage. Selectors are compound only (`tag#id.class[attr=value]`).
//!
//! ## API overview
//!
//! - [`Document`]: shared handle to the node tree. See [`Document::dispatch`]
//!   for the capture → target → bubble ordering.
//! - [`Event`] / [`EventType`] / [`Phase`]: event payload and propagation phases.
//! - [`Scheduler`]: virtual clock with timeouts ([`Scheduler::set_timeout`]) and
//!   deferred tasks ([`Scheduler::post`], [`Scheduler::flush`]).
//! - [`Deferred`]: single-assignment settled signal for deferred work.
//! - [`NodeId`] / [`ListenerId`] / [`TimerId`]: small copyable handles.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_dom::{Document, Event, EventType};
//! use std::{cell::Cell, rc::Rc};
//!
//! let doc = Document::new();
//! let button = doc.create_element("button");
//! doc.append_child(doc.body(), button).unwrap();
//!
//! let clicks = Rc::new(Cell::new(0));
//! let c = clicks.clone();
//! // Listen on the document in the bubble phase.
//! doc.add_event_listener(doc.root(), EventType::Click, false, move |e| {
//!     assert_eq!(e.target(), Some(button));
//!     c.set(c.get() + 1);
//! });
//!
//! doc.dispatch(button, Event::new(EventType::Click));
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod error;
mod event;
mod scheduler;
mod selector;
mod types;

pub use document::{Document, ListenerFn};
pub use error::DomError;
pub use event::{Event, EventType, Phase};
pub use scheduler::{Deferred, Scheduler, TimerId};
pub use selector::Selector;
pub use types::{ListenerId, NodeId};
