// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_behaviors::{ClickOutside, ClickOutsideProps, LayerStack, POINTER_DEBOUNCE_MS};
use understory_dom::{Document, Event, EventType, NodeId};

struct Stack {
    doc: Document,
    outside: NodeId,
    fired: Rc<Cell<u64>>,
    _effects: Vec<ClickOutside>,
}

/// `depth` nested layers, each registered on top of its parent.
fn nested_layers(depth: usize) -> Stack {
    let doc = Document::new();
    let outside = doc.create_element("button");
    doc.append_child(doc.body(), outside).unwrap();
    let layers = LayerStack::new();
    let fired = Rc::new(Cell::new(0));
    let mut parent = doc.body();
    let mut effects = Vec::with_capacity(depth);
    for _ in 0..depth {
        let layer = doc.create_element("div");
        doc.append_child(parent, layer).unwrap();
        let counter = fired.clone();
        effects.push(ClickOutside::new(
            &doc,
            layer,
            &layers,
            ClickOutsideProps::new(move |_| counter.set(counter.get() + 1)),
        ));
        parent = layer;
    }
    Stack {
        doc,
        outside,
        fired,
        _effects: effects,
    }
}

fn click(doc: &Document, at: NodeId) {
    for ty in [EventType::PointerDown, EventType::MouseDown] {
        doc.dispatch(at, Event::new(ty));
    }
    doc.scheduler().advance(POINTER_DEBOUNCE_MS);
    for ty in [EventType::PointerUp, EventType::MouseUp, EventType::Click] {
        doc.dispatch(at, Event::new(ty));
    }
    doc.scheduler().advance(POINTER_DEBOUNCE_MS);
}

fn bench_outside_click(c: &mut Criterion) {
    let mut group = c.benchmark_group("outside_click_dispatch");
    for &depth in &[1_usize, 4, 16] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("gesture_{depth}_layers"), |b| {
            let stack = nested_layers(depth);
            b.iter(|| click(&stack.doc, black_box(stack.outside)));
            // Only the topmost layer may claim the gesture.
            assert!(stack.fired.get() > 0, "the top layer should have fired");
        });
    }
    group.finish();
}

criterion_group!(benches, bench_outside_click);
criterion_main!(benches);
