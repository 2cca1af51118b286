//! Benchmarks for content addressing and batch planning.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use statix_core::ContentAddress;
use statix_core::ExtractionPlan;
use std::hint::black_box;

fn member_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("assets/section{:02}/page{i:05}.html", i % 37))
        .collect()
}

fn bench_address(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_address");

    for count in [10, 1_000, 10_000] {
        let members = member_names(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &members, |b, members| {
            b.iter(|| ContentAddress::compute(black_box("42"), black_box(members)));
        });
    }

    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction_plan");
    let members = member_names(10_000);
    let address = ContentAddress::compute("42", &members);

    for batch_size in [1, 10, 250] {
        group.bench_with_input(
            BenchmarkId::new("batch_size", batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    ExtractionPlan::new(
                        address.clone(),
                        black_box(&members),
                        batch_size,
                        "index.html",
                    )
                    .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_address, bench_plan);
criterion_main!(benches);
