// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating positioning with flip, shift and an arrow.
//!
//! A tooltip prefers the top of its anchor. Scrolling the anchor towards the
//! top edge of the viewport makes it flip below.
//!
//! Run:
//! - `cargo run -p understory_demos --example floating`

use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_behaviors::{Floating, FloatingProps};
use understory_dom::{Document, Event, EventType, NodeId};
use understory_effect::Effect;

fn report(doc: &Document, tooltip: NodeId, arrow: NodeId) {
    let style = |node, name| doc.style(node, name).unwrap_or_default();
    println!(
        "  side={} align={} top={} left={} | arrow left={} transform={}",
        doc.get_attribute(tooltip, "data-side").unwrap_or_default(),
        doc.get_attribute(tooltip, "data-align").unwrap_or_default(),
        style(tooltip, "top"),
        style(tooltip, "left"),
        style(arrow, "left"),
        style(arrow, "transform"),
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = Document::new();
    doc.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
    let anchor = doc.create_element("button");
    let tooltip = doc.create_element("div");
    let arrow = doc.create_element("span");
    doc.append_child(doc.body(), anchor).unwrap();
    doc.append_child(doc.body(), tooltip).unwrap();
    doc.append_child(tooltip, arrow).unwrap();
    doc.set_attribute(arrow, "data-arrow", "true");
    doc.set_rect(arrow, Rect::new(0.0, 0.0, 10.0, 10.0));
    doc.set_rect(tooltip, Rect::new(0.0, 0.0, 160.0, 40.0));
    doc.set_rect(anchor, Rect::new(20.0, 300.0, 100.0, 330.0));

    let mut floating = Floating::new(&doc, tooltip, FloatingProps::new(anchor));
    doc.scheduler().flush();
    println!("== Anchor mid-page, near the left edge ==");
    report(&doc, tooltip, arrow);

    doc.set_rect(anchor, Rect::new(20.0, 10.0, 100.0, 40.0));
    doc.dispatch(anchor, Event::new(EventType::Scroll));
    doc.scheduler().flush();
    println!("== Anchor scrolled to the top ==");
    report(&doc, tooltip, arrow);

    floating.destroy();
}
