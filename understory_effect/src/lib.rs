// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_effect --heading-base-level=0

//! Understory Effect: the lifecycle contract for headless UI behaviors.
//!
//! Every behavior in Understory is an [`Effect`]: attached to a node once with
//! full props, updated with partial props, destroyed at most once. This crate
//! provides that contract and the small pieces behaviors are assembled from.
//!
//! ## API overview
//!
//! - [`Effect`] / [`Patch`]: the update/destroy contract and partial props.
//! - [`EffectSet`]: ordered teardown bag for composite behaviors.
//! - [`on`] / [`Subscription`]: listener registration with explicit teardown.
//! - [`debounce`] / [`Debounced`]: trailing-edge debouncing on the host clock.
//! - [`DebouncedEffect`]: construction and updates of an inner effect, debounced.
//! - [`Attributes`] / [`AttrValue`] / [`AttributeReconciler`]: idempotent attribute sync.
//! - [`ElementBuilder`] / [`Element`]: props-to-attributes recipe plus an inner effect.
//!
//! ## Example
//!
//! ```
//! use understory_dom::Document;
//! use understory_effect::{Attributes, Effect, ElementBuilder, Patch};
//!
//! #[derive(Clone)]
//! struct Props {
//!     pressed: bool,
//! }
//!
//! impl Patch for Props {
//!     type Partial = Props;
//!     fn merge(&mut self, partial: Props) {
//!         *self = partial;
//!     }
//! }
//!
//! let doc = Document::new();
//! let node = doc.create_element("button");
//! doc.append_child(doc.body(), node).unwrap();
//!
//! let toggle = ElementBuilder::new()
//!     .attributes(|p: &Props| Attributes::new().with("aria-pressed", p.pressed));
//! let mut el = toggle.attach(&doc, node, Props { pressed: false });
//! assert_eq!(doc.get_attribute(node, "aria-pressed").as_deref(), Some("false"));
//!
//! el.update(Props { pressed: true });
//! assert_eq!(doc.get_attribute(node, "aria-pressed").as_deref(), Some("true"));
//! el.destroy();
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attributes;
mod debounce;
mod effect;
mod element;
mod on;

pub use attributes::{AttrValue, AttributeReconciler, Attributes, Reconciled};
pub use debounce::{DEFAULT_WAIT_MS, DebouncedEffect, Debounced, debounce};
pub use effect::{Effect, EffectSet, Patch};
pub use element::{AttributesFn, EffectFactory, Element, ElementBuilder};
pub use on::{ListenerOptions, Subscription, on};
