//! String interning benchmarks.
//!
//! Measures interning of fresh names, re-interning of names already seen,
//! and symbol resolution, using selector-shaped text.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use objcx_mem::{StringInterner, Symbol};

fn selector_text(i: usize) -> String {
    match i % 3 {
        0 => format!("method{i}"),
        1 => format!("method{i}:"),
        _ => format!("method{i}:with:"),
    }
}

fn bench_intern_new(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern_new");

    for size in [10, 100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let strings: Vec<String> = (0..size).map(selector_text).collect();

            b.iter(|| {
                let mut interner = StringInterner::new();
                for s in &strings {
                    black_box(interner.intern(s));
                }
            });
        });
    }

    group.finish();
}

fn bench_intern_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern_duplicates");

    for size in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let strings: Vec<String> = (0..size).map(selector_text).collect();
            let mut interner = StringInterner::new();
            for s in &strings {
                interner.intern(s);
            }

            b.iter(|| {
                for s in &strings {
                    black_box(interner.intern(s));
                }
            });
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [10, 100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut interner = StringInterner::new();
            let symbols: Vec<Symbol> = (0..size)
                .map(|i| interner.intern(&selector_text(i)))
                .collect();

            b.iter(|| {
                for &sym in &symbols {
                    black_box(interner.resolve(sym));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_intern_new, bench_intern_duplicates, bench_resolve);
criterion_main!(benches);
