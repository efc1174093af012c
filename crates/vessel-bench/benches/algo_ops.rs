//! Criterion micro-benchmarks for algorithm dispatch: the same search
//! over cursors of different categories, and copy fast paths.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use vessel_algo::{accumulate, copy, find_end, find_first_of};
use vessel_bench::{filled_list, keys, periodic_text};
use vessel_containers::{Array, List};
use vessel_core::{ForwardOnly, SliceCursor};

/// Benchmark: find_end over random-access, bidirectional and forward-only
/// cursors. The last match sits near the end, so reverse scans stop early.
fn bench_find_end_tiers(c: &mut Criterion) {
    let text = periodic_text(16, 256);
    let pattern: Vec<u32> = (0..16).collect();
    let array: Array<u32> = text.iter().copied().collect();
    let list: List<u32> = text.iter().copied().collect();

    let mut group = c.benchmark_group("find_end");
    group.bench_function("random_access", |b| {
        b.iter(|| {
            let hit = find_end(
                array.begin(),
                array.end(),
                SliceCursor::begin(&pattern),
                SliceCursor::end(&pattern),
            );
            black_box(hit.index());
        });
    });
    group.bench_function("bidirectional", |b| {
        b.iter(|| {
            let hit = find_end(
                list.begin(),
                list.end(),
                SliceCursor::begin(&pattern),
                SliceCursor::end(&pattern),
            );
            black_box(hit.node());
        });
    });
    group.bench_function("forward", |b| {
        b.iter(|| {
            let hit = find_end(
                ForwardOnly::new(array.begin()),
                ForwardOnly::new(array.end()),
                SliceCursor::begin(&pattern),
                SliceCursor::end(&pattern),
            );
            black_box(hit.into_inner().index());
        });
    });
    group.finish();
}

/// Benchmark: find_first_of with a small needle set over a list.
fn bench_find_first_of(c: &mut Criterion) {
    let list = filled_list(10_000, 1_000_000, 11);
    let needles = keys(8, 1_000_000, 99);
    c.bench_function("find_first_of_list_10k", |b| {
        b.iter(|| {
            let hit = find_first_of(
                list.begin(),
                list.end(),
                SliceCursor::begin(&needles),
                SliceCursor::end(&needles),
            );
            black_box(hit.node());
        });
    });
}

/// Benchmark: copy of trivially assignable values against clone_from.
fn bench_copy(c: &mut Criterion) {
    let src: Vec<u64> = (0..100_000).collect();
    let mut dst = vec![0u64; src.len()];
    c.bench_function("copy_pod_100k", |b| {
        b.iter(|| black_box(copy(&src, &mut dst)));
    });

    let src: Vec<String> = (0..10_000).map(|i| i.to_string()).collect();
    let mut dst = vec![String::new(); src.len()];
    c.bench_function("copy_string_10k", |b| {
        b.iter(|| black_box(copy(&src, &mut dst)));
    });
}

/// Benchmark: accumulate over a list.
fn bench_accumulate(c: &mut Criterion) {
    let list: List<u64> = (0..10_000).collect();
    c.bench_function("accumulate_list_10k", |b| {
        b.iter(|| black_box(accumulate(list.begin(), list.end(), 0u64)));
    });
}

criterion_group!(
    benches,
    bench_find_end_tiers,
    bench_find_first_of,
    bench_copy,
    bench_accumulate
);
criterion_main!(benches);
