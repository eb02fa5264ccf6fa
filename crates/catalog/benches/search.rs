//! Benchmarks for catalogue indexing, search and grouping.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recycle_catalog::{group, FuzzyIndex, IndexOptions, Item, ItemStore, QueryEngine, Tag};

const STEMS: &[&str] = &[
    "bottle", "can", "carton", "jar", "tray", "wrapper", "bag", "box", "pot", "lid", "tube",
    "foil", "paper", "card", "peel",
];

fn create_test_store(count: usize) -> ItemStore {
    let items = (0..count)
        .map(|i| {
            let stem = STEMS[i % STEMS.len()];
            Item::new(format!("{stem} {i}"), [Tag::new("Blue Bin")])
                .with_synonyms([Tag::new(format!("{} {stem}", i % 7))])
        })
        .collect();
    ItemStore::new(items)
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [100, 1000, 10000].iter() {
        let store = create_test_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| FuzzyIndex::build(black_box(&store), IndexOptions::default()))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [100, 1000, 10000].iter() {
        let engine = QueryEngine::with_defaults(create_test_store(*size)).unwrap();
        group.bench_with_input(BenchmarkId::new("exact", size), size, |b, _| {
            b.iter(|| engine.search(black_box("bottle")))
        });
        group.bench_with_input(BenchmarkId::new("misspelt", size), size, |b, _| {
            b.iter(|| engine.search(black_box("botle")))
        });
    }

    group.finish();
}

fn bench_group(c: &mut Criterion) {
    let items = create_test_store(10000).items().to_vec();

    c.bench_function("group_10000", |b| b.iter(|| group(black_box(items.clone()))));
}

criterion_group!(benches, bench_index_build, bench_search, bench_group);
criterion_main!(benches);
