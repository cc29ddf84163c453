// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_dom::{Document, NodeId};
use understory_effect::{AttrValue, AttributeReconciler, Attributes};

fn gen_attributes(n: usize, generation: u64) -> Attributes {
    (0..n)
        .map(|i| {
            let name = format!("data-attr-{i}");
            // Every fourth attribute changes with the generation, every seventh toggles presence.
            let value = if i % 7 == 0 && generation % 2 == 1 {
                AttrValue::Absent
            } else if i % 4 == 0 {
                AttrValue::Int(generation as i64)
            } else {
                AttrValue::Text(format!("v{i}"))
            };
            (name, value)
        })
        .collect()
}

fn setup(n: usize) -> (Document, NodeId, AttributeReconciler) {
    let doc = Document::new();
    let node = doc.create_element("div");
    doc.append_child(doc.body(), node).unwrap();
    let mut reconciler = AttributeReconciler::new();
    reconciler.apply(&doc, node, &gen_attributes(n, 0));
    (doc, node, reconciler)
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute_reconcile");
    for &n in &[8_usize, 32, 128] {
        group.throughput(Throughput::Elements(n as u64));

        let unchanged = gen_attributes(n, 0);
        group.bench_function(format!("noop_{n}"), |b| {
            let (doc, node, mut reconciler) = setup(n);
            b.iter(|| black_box(reconciler.apply(&doc, node, black_box(&unchanged))));
        });

        let next = gen_attributes(n, 1);
        group.bench_function(format!("churn_{n}"), |b| {
            b.iter_batched(
                || setup(n),
                |(doc, node, mut reconciler)| black_box(reconciler.apply(&doc, node, &next)),
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("initial_{n}"), |b| {
            b.iter_batched(
                || {
                    let doc = Document::new();
                    let node = doc.create_element("div");
                    doc.append_child(doc.body(), node).unwrap();
                    (doc, node)
                },
                |(doc, node)| {
                    let mut reconciler = AttributeReconciler::new();
                    black_box(reconciler.apply(&doc, node, &unchanged))
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
