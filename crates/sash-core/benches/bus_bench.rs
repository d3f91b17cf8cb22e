//! Benchmarks for the event bus.
//!
//! Run with: cargo bench -p sash-core

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sash_core::bus::{BusPayload, EventBus, RESIZE, container_resize_event};
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("bus/publish");

    for listeners in [1, 8, 64, 512] {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0u64));
        for _ in 0..listeners {
            let hits = Rc::clone(&hits);
            bus.subscribe(RESIZE, bus.listener_id(), move |payload| {
                black_box(payload.delta());
                hits.set(hits.get() + 1);
            });
        }

        group.bench_with_input(BenchmarkId::new("resize", listeners), &bus, |b, bus| {
            b.iter(|| bus.publish(RESIZE, BusPayload::AxisDelta(1.0)));
        });
    }

    group.finish();
}

fn bench_targeted_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("bus/targeted");

    for containers in [4, 32, 256] {
        let bus = EventBus::new();
        let names: Vec<String> = (0..containers)
            .map(|i| container_resize_event(&format!("pane-{i}")))
            .collect();
        for name in &names {
            bus.subscribe(name, bus.listener_id(), |payload| {
                black_box(payload.delta());
            });
        }

        group.bench_with_input(
            BenchmarkId::new("one_of", containers),
            &names,
            |b, names| {
                b.iter(|| bus.publish(&names[names.len() / 2], BusPayload::Diff(3.0)));
            },
        );
    }

    group.finish();
}

fn bench_subscribe_unsubscribe(c: &mut Criterion) {
    let bus = EventBus::new();
    c.bench_function("bus/subscribe_unsubscribe", |b| {
        b.iter(|| {
            let guard = bus.subscribe_guarded(RESIZE, |_| {});
            black_box(guard.id());
        });
    });
}

criterion_group!(
    benches,
    bench_publish,
    bench_targeted_publish,
    bench_subscribe_unsubscribe
);
criterion_main!(benches);
