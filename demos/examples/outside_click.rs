// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered outside clicks.
//!
//! A popover is opened inside a dialog. Clicking the page first dismisses the
//! popover only; once it is gone, the next click dismisses the dialog.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example outside_click`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_behaviors::{ClickOutside, ClickOutsideProps, LayerStack, POINTER_DEBOUNCE_MS};
use understory_dom::{Document, Event, EventType, NodeId};
use understory_effect::Effect;

fn click(doc: &Document, at: NodeId) {
    doc.dispatch(at, Event::new(EventType::PointerDown));
    doc.scheduler().advance(POINTER_DEBOUNCE_MS);
    doc.dispatch(at, Event::new(EventType::PointerUp));
    doc.dispatch(at, Event::new(EventType::Click));
    doc.scheduler().advance(POINTER_DEBOUNCE_MS);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = Document::new();
    let page = doc.create_element("main");
    let dialog = doc.create_element("div");
    let popover = doc.create_element("div");
    doc.append_child(doc.body(), page).unwrap();
    doc.append_child(doc.body(), dialog).unwrap();
    doc.append_child(dialog, popover).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let layers = LayerStack::new();
    let on_dismiss = |name: &'static str| {
        let log = log.clone();
        ClickOutsideProps::new(move |_| log.borrow_mut().push(name))
    };
    let mut dialog_effect = ClickOutside::new(&doc, dialog, &layers, on_dismiss("dialog"));
    let mut popover_effect = ClickOutside::new(&doc, popover, &layers, on_dismiss("popover"));

    println!("== Click page with popover open ==");
    click(&doc, page);
    println!("dismissed: {:?}", log.borrow());

    popover_effect.destroy();
    doc.remove(popover);

    println!("== Click inside dialog ==");
    click(&doc, dialog);
    println!("dismissed: {:?}", log.borrow());

    println!("== Click page again ==");
    click(&doc, page);
    println!("dismissed: {:?}", log.borrow());

    dialog_effect.destroy();
    println!("layers left: {}", layers.len());
}
