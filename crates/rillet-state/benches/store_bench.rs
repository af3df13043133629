//! Benchmarks for store access and the mirror/bind hot path.
//!
//! Run with: cargo bench -p rillet-state --bench store_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rillet_state::{StateStore, bind_local_to_global, mirror_global_to_local};
use std::hint::black_box;

fn populated_store(keys: usize) -> StateStore {
    let mut store = StateStore::new();
    for i in 0..keys {
        store.set(format!("global_key_{i}"), i as i64);
    }
    store
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/get");

    for keys in [16usize, 256, 4096] {
        let store = populated_store(keys);
        let probe = format!("global_key_{}", keys / 2);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &(), |b, _| {
            b.iter(|| black_box(store.get(black_box(&probe)).unwrap()));
        });
    }

    group.finish();
}

fn bench_set_overwrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("store/set_overwrite");

    for keys in [16usize, 256, 4096] {
        let mut store = populated_store(keys);
        let probe = format!("global_key_{}", keys / 2);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &(), |b, _| {
            let mut n = 0i64;
            b.iter(|| {
                n = n.wrapping_add(1);
                store.set(probe.clone(), n);
            });
        });
    }

    group.finish();
}

/// One whole protocol round per iteration: mirror, simulated edit, binder.
/// This is what every synced widget costs per render pass.
fn bench_mirror_bind_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync/mirror_bind_cycle");

    for keys in [16usize, 256] {
        let mut store = populated_store(keys);
        store.set("global_threshold", 50i64);
        let binding = bind_local_to_global("_local_threshold", "global_threshold");
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &(), |b, _| {
            let mut n = 0i64;
            b.iter(|| {
                mirror_global_to_local(&mut store, "_local_threshold", "global_threshold")
                    .unwrap();
                n = n.wrapping_add(1);
                store.set("_local_threshold", n);
                binding.apply(&mut store).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_get,
    bench_set_overwrite,
    bench_mirror_bind_cycle
);
criterion_main!(benches);
