// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use canopy_hub::{Callback, EventHub, OffOptions, OnOptions, Phase, TriggerOptions};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}

/// A callback that only bumps a counter, keeping the measurement on the
/// dispatch walk rather than on callback work.
fn counting_callback(hits: &Rc<Cell<u64>>) -> Callback<u64> {
    let hits = Rc::clone(hits);
    Callback::new(move |_, _| hits.set(hits.get() + 1))
}

/// `s0.s1.…` with `depth` segments.
fn chain_name(depth: usize) -> String {
    (0..depth)
        .map(|i| format!("s{i}"))
        .collect::<Vec<_>>()
        .join(".")
}

fn bench_target_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("target");
    for &depth in &[2usize, 4, 8] {
        let hits = Rc::new(Cell::new(0u64));
        let hub: EventHub<u64> = EventHub::new();
        let name = chain_name(depth);
        for _ in 0..4 {
            hub.on(&name, &counting_callback(&hits), OnOptions::default());
        }
        group.bench_function(format!("trigger_depth{}", depth), |b| {
            b.iter(|| {
                let fired = hub.trigger(&name, Some(&1), TriggerOptions::default());
                black_box(fired);
            })
        });
    }
    group.finish();
}

fn bench_phase_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("phases");
    for &depth in &[4usize, 8, 16] {
        let hits = Rc::new(Cell::new(0u64));
        let hub: EventHub<u64> = EventHub::new();
        // A both-tagged watcher at every ancestor of the target.
        for i in 1..depth {
            hub.on(
                &chain_name(i),
                &counting_callback(&hits),
                OnOptions {
                    phase: Phase::Both,
                    ..OnOptions::default()
                },
            );
        }
        let name = chain_name(depth);
        hub.on(&name, &counting_callback(&hits), OnOptions::default());
        group.throughput(Throughput::Elements((2 * (depth - 1) + 1) as u64));
        group.bench_function(format!("capture_bubble_depth{}", depth), |b| {
            b.iter(|| {
                let fired = hub.trigger(&name, Some(&1), TriggerOptions::default());
                black_box(fired);
            })
        });
    }
    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");
    for &fanout in &[8usize, 16, 32] {
        let hits = Rc::new(Cell::new(0u64));
        let hub: EventHub<u64> = EventHub::new();
        for i in 0..fanout {
            for j in 0..fanout {
                hub.on(
                    &format!("root.c{i}.g{j}"),
                    &counting_callback(&hits),
                    OnOptions::default(),
                );
            }
        }
        group.throughput(Throughput::Elements((fanout * fanout) as u64));
        group.bench_function(format!("descend_fanout{}", fanout), |b| {
            b.iter(|| {
                let fired = hub.trigger(
                    "root",
                    Some(&1),
                    TriggerOptions {
                        traverse: true,
                        ..TriggerOptions::default()
                    },
                );
                black_box(fired);
            })
        });

        // The counting-only view of the same walk.
        group.bench_function(format!("simulate_fanout{}", fanout), |b| {
            b.iter(|| {
                let fired = hub.fake().trigger(
                    "root",
                    TriggerOptions {
                        traverse: true,
                        ..TriggerOptions::default()
                    },
                );
                black_box(fired);
            })
        });
    }
    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    for &count in &[100usize, 1000] {
        let mut rng = Rng::new(0x00C0_FFEE_0BAD_F00D);
        let names: Vec<String> = (0..count)
            .map(|_| {
                let a = rng.next_usize(16);
                let b = rng.next_usize(16);
                let c = rng.next_usize(16);
                format!("n{a}.n{b}.n{c}")
            })
            .collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("on_off_x{}", count), |b| {
            b.iter_batched(
                EventHub::<u64>::new,
                |hub| {
                    let hits = Rc::new(Cell::new(0u64));
                    let cb = counting_callback(&hits);
                    for name in &names {
                        hub.on(name, &cb, OnOptions::default());
                    }
                    let mut removed = 0;
                    for name in &names {
                        removed += hub.off(name, Some(&cb), OffOptions::default());
                    }
                    black_box(removed);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_target_dispatch,
    bench_phase_walk,
    bench_traverse,
    bench_registration,
);
criterion_main!(benches);
