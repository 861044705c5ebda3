//! Benchmarks for the similarity metrics.

use calorie_search::{Similarity, partial_ratio, token_set_ratio};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const DESCRIPTIONS: &[&str] = &[
    "Macaroni and cheese",
    "Macaroni and cheese, boxed mix, prepared",
    "Cheese, cheddar",
    "Pasta with tomato-based sauce and meat, restaurant",
    "Beef, ground, 80% lean meat / 20% fat, raw",
];

fn bench_single_pair(c: &mut Criterion) {
    c.bench_function("similarity_single", |b| {
        b.iter(|| {
            Similarity::between(
                black_box("macaroni and cheese"),
                black_box("macaroni and cheese, boxed mix, prepared"),
            )
        })
    });
}

fn bench_page_of_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_page");

    for size in [5, 25, 200] {
        let page: Vec<&str> = DESCRIPTIONS.iter().copied().cycle().take(size).collect();

        group.bench_with_input(BenchmarkId::new("all_metrics", size), &page, |b, page| {
            b.iter(|| {
                page.iter()
                    .map(|d| Similarity::between(black_box("mac and cheese"), &d.to_lowercase()))
                    .count()
            })
        });
    }

    group.finish();
}

fn bench_individual_metrics(c: &mut Criterion) {
    let text = "pasta with tomato-based sauce and meat, restaurant";
    let mut group = c.benchmark_group("metrics");

    group.bench_function("partial_ratio", |b| {
        b.iter(|| partial_ratio(black_box("spaghetti bolognese"), black_box(text)))
    });

    group.bench_function("token_set_ratio", |b| {
        b.iter(|| token_set_ratio(black_box("spaghetti bolognese"), black_box(text)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_pair,
    bench_page_of_candidates,
    bench_individual_metrics
);
criterion_main!(benches);
