use autocomplete_index::{AutocompleteIndex, IndexConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

const CITY_WORDS: &[&str] = &[
    "new", "san", "los", "lake", "port", "fort", "mount", "north", "south", "east", "west",
    "springs", "valley", "creek", "ridge", "falls", "grove", "harbor", "junction", "heights",
];

fn random_name(rng: &mut impl Rng) -> String {
    let words = rng.gen_range(1..=3);
    (0..words)
        .map(|_| CITY_WORDS[rng.gen_range(0..CITY_WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn seeded_index(n: u32) -> AutocompleteIndex<u32, String> {
    let mut rng = rand::thread_rng();
    let index = AutocompleteIndex::new();
    for key in 0..n {
        index.add_scored(key, random_name(&mut rng), rng.gen_range(0.0..100.0));
    }
    index
}

fn bench_single_add(c: &mut Criterion) {
    let index = AutocompleteIndex::new();
    let mut rng = rand::thread_rng();
    let mut key = 0u32;
    c.bench_function("add_single_entry", |b| {
        b.iter(|| {
            index.add_scored(key, random_name(&mut rng), 0.0);
            key += 1;
        });
    });
}

fn bench_autocomplete_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("autocomplete_cache_miss");
    for size in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let index = seeded_index(size);
            index.set_max_cache_prefix_len(0).unwrap(); // force every lookup to scan
            b.iter(|| black_box(index.autocomplete("s", 10)));
        });
    }
    group.finish();
}

fn bench_autocomplete_cache_hit(c: &mut Criterion) {
    let index = seeded_index(10_000);
    index.autocomplete("s", 10); // warm the cache
    c.bench_function("autocomplete_cache_hit", |b| {
        b.iter(|| black_box(index.autocomplete("s", 10)));
    });
}

fn bench_set_score_invalidation(c: &mut Criterion) {
    let index = seeded_index(10_000);
    index.autocomplete("s", 10); // warm the cache so every call below must invalidate it
    let mut score = 0.0;
    c.bench_function("set_score_with_cache_invalidation", |b| {
        b.iter(|| {
            index.set_score(&0, score).unwrap();
            score += 1.0;
        });
    });
}

criterion_group!(
    benches,
    bench_single_add,
    bench_autocomplete_miss,
    bench_autocomplete_cache_hit,
    bench_set_score_invalidation
);
criterion_main!(benches);
