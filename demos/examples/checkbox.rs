// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A controlled checkbox.
//!
//! The trigger only requests changes; the owner applies them with `update`,
//! and the attribute reconciler writes just the attributes that changed.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example checkbox`

use std::cell::Cell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_behaviors::{Checkbox, CheckboxPatch, CheckboxProps};
use understory_dom::{Document, Event, EventType, NodeId};
use understory_effect::Effect;

fn dump(doc: &Document, label: &str, node: NodeId) {
    let attrs: Vec<String> = doc
        .attribute_names(node)
        .into_iter()
        .map(|name| {
            let value = doc.get_attribute(node, &name).unwrap_or_default();
            format!("{name}={value:?}")
        })
        .collect();
    println!("  {label}: {}", attrs.join(" "));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = Document::new();
    let trigger = doc.create_element("button");
    let input = doc.create_element("input");
    doc.append_child(doc.body(), trigger).unwrap();
    doc.append_child(doc.body(), input).unwrap();

    let requested = Rc::new(Cell::new(None));
    let sink = requested.clone();
    let mut checkbox = Checkbox::new(
        &doc,
        trigger,
        input,
        CheckboxProps::new("newsletter", "weekly")
            .required(true)
            .on_change(move |v| sink.set(Some(v))),
    );

    println!("== Initial ==");
    dump(&doc, "trigger", trigger);
    dump(&doc, "input", input);

    for (label, event) in [
        ("click", Event::new(EventType::Click)),
        ("Space", Event::key_down(" ")),
        ("Enter", Event::key_down("Enter")),
    ] {
        doc.dispatch(trigger, event);
        let Some(next) = requested.take() else {
            continue;
        };
        let before = doc.mutation_count();
        checkbox.update(CheckboxPatch {
            checked: Some(next),
            ..CheckboxPatch::default()
        });
        println!(
            "== {label}: checked={next}, {} attribute writes ==",
            doc.mutation_count() - before
        );
        dump(&doc, "trigger", trigger);
    }

    checkbox.destroy();
}
