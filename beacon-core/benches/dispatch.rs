use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use beacon_core::{InlineSpawner, PrioritySignal, Signal, SignalBuilder};

fn fire_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("fire_sync");
    for listeners in [1usize, 16, 256] {
        let signal: Signal<u64> = SignalBuilder::new().capacity(listeners).build();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..listeners {
            let hits = hits.clone();
            signal
                .connect_bound(&[1], move |args| {
                    hits.fetch_add(args.len(), Ordering::Relaxed);
                })
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(listeners), &listeners, |b, _| {
            b.iter(|| signal.fire_sync(black_box(&[2u64, 3][..])).unwrap())
        });
    }
    group.finish();
}

fn fire_inline_priority(c: &mut Criterion) {
    let signal: PrioritySignal<u64> = SignalBuilder::new().spawner(InlineSpawner).build_priority();
    for priority in 0..64 {
        signal.connect_priority(priority % 8, |_| {}).unwrap();
    }

    c.bench_function("fire_inline_priority_64", |b| {
        b.iter(|| signal.fire(black_box(&[1u64][..])).unwrap())
    });
}

fn connect_disconnect_churn(c: &mut Criterion) {
    let signal: Signal<u64> = Signal::new();

    c.bench_function("connect_disconnect", |b| {
        b.iter(|| {
            let connection = signal.connect(|_| {}).unwrap();
            connection.disconnect();
        })
    });

    let connection = signal.connect(|_| {}).unwrap();
    c.bench_function("disconnect_reconnect", |b| {
        b.iter(|| {
            connection.disconnect();
            connection.reconnect().unwrap();
        })
    });
}

criterion_group!(benches, fire_sync, fire_inline_priority, connect_disconnect_churn);
criterion_main!(benches);
