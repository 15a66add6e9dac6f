// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compares the three sort engines on initial sorting and on absorbing
//! edits into an already-settled projection.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::seq::SliceRandom;

use windrow_list_model::{ListModel, VecModel};
use windrow_sort_list::{FullSortModel, IdleQueue, IncrementalSortModel, TrackingSortModel};
use windrow_sorter::NaturalSorter;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn shuffled(n: usize) -> Vec<u32> {
    let mut items: Vec<u32> = (0..n as u32).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    items.shuffle(&mut rng);
    items
}

fn initial_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_sort");
    for n in SIZES {
        let items = shuffled(n);

        group.bench_with_input(BenchmarkId::new("full", n), &items, |b, items| {
            b.iter(|| {
                let model = VecModel::from_items(items.iter().copied());
                let sorted = FullSortModel::new(Some(model), Some(NaturalSorter::new()));
                black_box(sorted.get(0))
            });
        });
        group.bench_with_input(BenchmarkId::new("tracking", n), &items, |b, items| {
            b.iter(|| {
                let model = VecModel::from_items(items.iter().copied());
                let sorted = TrackingSortModel::new(Some(model), Some(NaturalSorter::new()));
                black_box(sorted.get(0))
            });
        });
        group.bench_with_input(BenchmarkId::new("incremental", n), &items, |b, items| {
            b.iter(|| {
                let queue = IdleQueue::new();
                let model = VecModel::from_items(items.iter().copied());
                let sorted = IncrementalSortModel::with(
                    &queue,
                    Some(model),
                    Some(NaturalSorter::new()),
                );
                queue.drain();
                black_box(sorted.get(0))
            });
        });
    }
    group.finish();
}

fn settled_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("settled_edit");
    for n in SIZES {
        let items = shuffled(n);

        // One push-then-remove pair per iteration keeps the collection at a
        // stable size while exercising the engines' edit paths.
        group.bench_with_input(BenchmarkId::new("full", n), &items, |b, items| {
            let model = VecModel::from_items(items.iter().copied());
            let sorted = FullSortModel::new(Some(model.clone()), Some(NaturalSorter::new()));
            b.iter(|| {
                model.push(n as u32 / 2);
                model.remove(n);
                black_box(sorted.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("tracking", n), &items, |b, items| {
            let model = VecModel::from_items(items.iter().copied());
            let sorted =
                TrackingSortModel::new(Some(model.clone()), Some(NaturalSorter::new()));
            b.iter(|| {
                model.push(n as u32 / 2);
                model.remove(n);
                black_box(sorted.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("incremental", n), &items, |b, items| {
            let queue = IdleQueue::new();
            let model = VecModel::from_items(items.iter().copied());
            let sorted = IncrementalSortModel::with(
                &queue,
                Some(model.clone()),
                Some(NaturalSorter::new()),
            );
            queue.drain();
            b.iter(|| {
                model.push(n as u32 / 2);
                model.remove(n);
                black_box(sorted.len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, initial_sort, settled_edit);
criterion_main!(benches);
